use crate::reports;
use clap::Args;
use recall_wager::config::SessionArgs;
use recall_wager::design::session_rng;
use recall_wager::error::WagerResult;
use recall_wager::session::build_plan;

#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Print the plan as JSON instead of tables
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn run(args: PlanArgs) -> WagerResult<()> {
    args.session.validate()?;
    let subject = args.session.subject_id();
    let mut rng = session_rng(args.session.seed);
    let plan = build_plan(&args.session, subject, &mut rng)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        reports::print_plan(&plan);
    }
    Ok(())
}
