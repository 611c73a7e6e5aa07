use std::process::ExitCode;
use std::sync::Arc;

use webmanager::config::Settings;
use webmanager::errors::{AppError, AppResult};
use webmanager::handlers::proposal_handlers::{
    DebouncedFetcher, ListContext, ListMessage, ProposalListOutcome, ProposalListView,
};
use webmanager::models::proposal::{InMemoryProposals, ProposalListItem, SemesterFilter, UserContext};
use webmanager::models::semester::SystemClock;
use webmanager::models::table_filter::prefs::FileStore;

const USAGE: &str = "usage: webmanager <proposals.json> [--mode <semester_filter>] \
[--range <start> <end>] [--semester <yyyy-n>] [--filter <name>] [--no-filter <name>] [--reset]";

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(path) = args.first() else {
        eprintln!("{USAGE}");
        return ExitCode::FAILURE;
    };

    match run(path, &args[1..]).await {
        Ok(outcome) => {
            print_outcome(&outcome);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(path: &str, options: &[String]) -> AppResult<ProposalListOutcome> {
    let settings = Settings::from_env();
    log::info!("Using preferences in {}", settings.prefs_dir.display());

    let mut view = ProposalListView::open(FileStore::new(&settings.prefs_dir), &settings)?;
    apply_options(&mut view, options)?;
    let filters: Vec<&str> = view
        .selection()
        .enabled_filters()
        .iter()
        .map(|f| f.label())
        .collect();
    if !filters.is_empty() {
        println!("Filters: {}", filters.join(", "));
    }

    let raw = std::fs::read_to_string(path)?;
    let proposals: Vec<ProposalListItem> = serde_json::from_str(&raw)?;
    log::info!("Loaded {} proposals from {path}", proposals.len());

    let user = UserContext { user_id: settings.user_id };
    let ctx = ListContext::new(user, &SystemClock);
    let fetcher = DebouncedFetcher::new(
        Arc::new(InMemoryProposals::new(proposals)),
        settings.debounce,
        view.result_cap(),
    );
    let mut rx = fetcher.subscribe();

    let request = match view.request_refresh(&ctx, &fetcher) {
        Ok(request) => request,
        Err(e) if e.is_user_input() => return Ok(ProposalListOutcome::failed(&e)),
        Err(e) => return Err(e),
    };
    if let Err(e) = request.await {
        log::error!("Refresh task failed: {e}");
    }

    let page = rx.borrow_and_update().clone();
    Ok(match page {
        Some(page) => view.handle_page(&ctx, &fetcher, &page).unwrap_or_default(),
        None => ProposalListOutcome::default(),
    })
}

fn apply_options<S>(view: &mut ProposalListView<S>, options: &[String]) -> AppResult<()>
where
    S: webmanager::models::table_filter::prefs::PrefStore,
{
    let mut it = options.iter().map(String::as_str);
    while let Some(opt) = it.next() {
        let mut value = || {
            it.next()
                .ok_or_else(|| AppError::InvalidArgument(format!("{opt} needs a value\n{USAGE}")))
        };
        match opt {
            "--mode" => view.set_semester_filter(SemesterFilter::try_from(value()?)?)?,
            "--range" => {
                let start = value()?;
                let end = value()?;
                view.set_semester_range(start, end)?;
                view.set_semester_filter(SemesterFilter::SemesterRange)?;
            }
            "--semester" => view.select_semester(value()?)?,
            "--filter" => view.set_filter(value()?, true)?,
            "--no-filter" => view.set_filter(value()?, false)?,
            "--reset" => view.reset()?,
            other => {
                return Err(AppError::InvalidArgument(format!("unknown option {other}\n{USAGE}")));
            }
        }
    }
    Ok(())
}

fn print_outcome(outcome: &ProposalListOutcome) {
    if let Some((start, end)) = &outcome.range {
        println!("Semesters {start} to {end}: {} proposals", outcome.proposals.len());
    }
    for message in &outcome.messages {
        match message {
            ListMessage::Error(text) => println!("error: {text}"),
            ListMessage::Warning(text) => println!("warning: {text}"),
        }
    }
    for p in &outcome.proposals {
        let liaison = p
            .liaison_astronomer
            .as_ref()
            .map(|la| la.full_name())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<16} {:<7} {:<24} {:<30} phase {} PI {} LA {} | {}",
            p.proposal_code,
            p.semester,
            p.status.label(),
            p.proposal_type.label(),
            p.phase,
            p.principal_investigator.full_name(),
            liaison,
            p.title
        );
    }
}
