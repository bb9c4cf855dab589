use crate::reports;
use clap::{ArgMatches, Args};
use fastrand::Rng;
use recall_wager::config::SessionArgs;
use recall_wager::design::session_rng;
use recall_wager::error::WagerResult;
use recall_wager::export;
use recall_wager::runner::{
    ConsoleDisplay, ConsoleInput, NullDisplay, RandomInput, TrialRunner,
};
use recall_wager::scoring::Scorer;
use recall_wager::session::build_plan;
use std::io;
use std::path::Path;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Answer every trial at random without delays (dry run of the pipeline)
    #[arg(long, default_value_t = false)]
    pub auto: bool,
}

pub fn run(args: RunArgs, matches: Option<&ArgMatches>) -> WagerResult<()> {
    let session = &args.session;
    session.validate()?;

    let payoffs = session.resolve_payoffs(matches)?;
    let subject = session.subject_id();
    let mut rng = session_rng(session.seed);

    info!("🧪 Subject {} | bias={} | n_items={}", subject, session.bias, session.n_items);
    let mut plan = build_plan(session, subject, &mut rng)?;
    let scorer = Scorer::new(payoffs);

    let tally = if args.auto {
        let mut display = NullDisplay::default();
        let mut input = RandomInput::new(Rng::with_seed(rng.u64(..)));
        let mut runner =
            TrialRunner::new(&mut display, &mut input, scorer, session.timing.clone());
        runner.run_plan(&mut plan)?
    } else {
        let mut display = ConsoleDisplay::new(io::stdout(), session.fullscreen);
        let mut input = ConsoleInput::new(io::stdin().lock());
        let mut runner =
            TrialRunner::new(&mut display, &mut input, scorer, session.timing.clone());
        runner.run_plan(&mut plan)?
    };

    let paths = export::write_session(Path::new(&session.out_dir), &plan)?;
    for p in &paths {
        info!("💾 {}", p.display());
    }
    reports::print_session_summary(&plan, &tally);
    Ok(())
}
