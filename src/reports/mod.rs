use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use recall_wager::scoring::SessionTally;
use recall_wager::sequencer::{GuessRow, ItemType, RecognitionRow, SourceRow, StudyRow};
use recall_wager::session::SessionPlan;

fn header(table: &mut Table, names: &[&str]) {
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        names
            .iter()
            .map(|n| Cell::new(n).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );
}

fn safe_cell(safe: ItemType) -> Cell {
    let c = Cell::new(safe);
    match safe {
        ItemType::Studied => c.fg(Color::Green),
        ItemType::Unstudied => c.fg(Color::Cyan),
    }
}

pub fn print_study_table(title: &str, rows: &[StudyRow]) {
    let mut table = Table::new();
    header(&mut table, &["Trial", "Block", "Source", "Word", "Stimulus"]);
    for r in rows {
        table.add_row(vec![
            Cell::new(r.trial).set_alignment(CellAlignment::Right),
            Cell::new(r.block).set_alignment(CellAlignment::Right),
            Cell::new(&r.source),
            Cell::new(&r.word),
            Cell::new(r.stimulus.display()),
        ]);
    }
    println!("\n{} ({} trials)\n{}", title, rows.len(), table);
}

pub fn print_guess_table(rows: &[GuessRow]) {
    let mut table = Table::new();
    header(&mut table, &["Trial", "Safe", "Correct"]);
    for r in rows {
        table.add_row(vec![
            Cell::new(r.trial).set_alignment(CellAlignment::Right),
            safe_cell(r.safe),
            Cell::new(r.correct),
        ]);
    }
    println!("\nGuess task ({} trials)\n{}", rows.len(), table);
}

pub fn print_recognition_table(rows: &[RecognitionRow]) {
    let mut table = Table::new();
    header(&mut table, &["Trial", "Word", "Type", "Safe", "Block", "Source"]);
    for r in rows {
        table.add_row(vec![
            Cell::new(r.trial).set_alignment(CellAlignment::Right),
            Cell::new(&r.word),
            Cell::new(r.item_type),
            safe_cell(r.safe),
            Cell::new(r.study_block.map(|b| b.to_string()).unwrap_or_default()),
            Cell::new(r.source.as_deref().unwrap_or("")),
        ]);
    }
    println!("\nRecognition test ({} trials)\n{}", rows.len(), table);
}

pub fn print_source_table(rows: &[SourceRow]) {
    let mut table = Table::new();
    header(&mut table, &["Trial", "Word", "Block", "Source"]);
    for r in rows {
        table.add_row(vec![
            Cell::new(r.trial).set_alignment(CellAlignment::Right),
            Cell::new(&r.word),
            Cell::new(r.study_block).set_alignment(CellAlignment::Right),
            Cell::new(&r.source),
        ]);
    }
    println!("\nSource test ({} trials)\n{}", rows.len(), table);
}

pub fn print_plan(plan: &SessionPlan) {
    println!("Subject: {}", plan.subject);
    print_study_table("Practice study", &plan.practice_study);
    print_guess_table(&plan.guess);
    print_study_table("Study", &plan.study);
    print_recognition_table(&plan.recognition);
    print_source_table(&plan.source);
}

pub fn print_session_summary(plan: &SessionPlan, tally: &SessionTally) {
    let mut table = Table::new();
    header(&mut table, &["Subject", "Points", "Decisions", "Correct", "Safe picks"]);

    let points = Cell::new(tally.total).set_alignment(CellAlignment::Right);
    let points = if tally.total >= 0 {
        points.fg(Color::Green)
    } else {
        points.fg(Color::Red)
    };

    table.add_row(vec![
        Cell::new(&plan.subject).add_attribute(Attribute::Bold),
        points,
        Cell::new(tally.decisions).set_alignment(CellAlignment::Right),
        Cell::new(format!("{:.1}%", tally.accuracy() * 100.0)).set_alignment(CellAlignment::Right),
        Cell::new(tally.safe_choices).set_alignment(CellAlignment::Right),
    ]);
    println!("\n{}", table);
}
