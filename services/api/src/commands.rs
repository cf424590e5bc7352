use careers::applications::modal::ERROR_ALERT;
use careers::applications::{
    submit_application, ApplicationModal, ClientSubmissionError, HttpRelayClient, ModalPhase,
    ResumeFile,
};
use careers::config::AppConfig;
use careers::error::AppError;
use careers::listings::{HttpJobListingSource, JobBoard, JobId, JobPosting};
use careers::telemetry;
use clap::Args;
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing::{info, warn};

const SENT_BANNER: &str = "Application Sent! Thank you for applying. We'll contact you soon.";
const EMPTY_BOARD: &str = "No job listings available at the moment.";

#[derive(Args, Debug, Default)]
pub(crate) struct JobsListArgs {
    /// Read listings from this URL instead of JOB_LISTINGS_URL
    #[arg(long)]
    pub(crate) url: Option<String>,
    /// Include postings whose status is not Active
    #[arg(long)]
    pub(crate) all: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ApplyArgs {
    /// SL_No of the posting to apply for
    #[arg(long)]
    pub(crate) job: String,
    #[arg(long)]
    pub(crate) name: String,
    #[arg(long)]
    pub(crate) email: String,
    #[arg(long, default_value = "")]
    pub(crate) message: String,
    /// Resume file to attach (.pdf, .doc or .docx expected)
    #[arg(long)]
    pub(crate) resume: Option<PathBuf>,
    /// Relay endpoint; defaults to RELAY_ENDPOINT
    #[arg(long)]
    pub(crate) endpoint: Option<String>,
    /// Listings URL; defaults to JOB_LISTINGS_URL
    #[arg(long)]
    pub(crate) listings_url: Option<String>,
}

pub(crate) async fn run_jobs_list(args: JobsListArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let source = listing_source(args.url, &config);
    let board = JobBoard::load(&source).await;

    print!("{}", render_board(&board, args.all));
    Ok(())
}

pub(crate) async fn run_apply(args: ApplyArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let source = listing_source(args.listings_url, &config);
    let client = match args.endpoint {
        Some(endpoint) => HttpRelayClient::new(endpoint),
        None => HttpRelayClient::from_config(&config.relay),
    };

    let board = JobBoard::load(&source).await;
    let board = board.select(&JobId::new(args.job.clone()));
    let Some(modal) = ApplicationModal::for_selection(&board) else {
        println!("No active job posting with SL_No {}.", args.job);
        return Ok(());
    };

    let resume = match args.resume {
        Some(path) => Some(ResumeFile::from_path(path).await?),
        None => None,
    };
    if let Some(resume) = resume.as_ref().filter(|resume| !resume.matches_accept_hint()) {
        warn!(file = %resume.file_name, "resume is not a .pdf, .doc or .docx file; sending anyway");
    }

    println!("Apply for {}", modal.job().display_title());
    println!("{}", modal.header());
    println!("{}", modal.job().teaser());

    let modal = modal
        .with_name(args.name)
        .with_email(args.email)
        .with_message(args.message)
        .with_resume(resume);

    info!(endpoint = client.endpoint(), "submitting application");
    let modal = submit_application(modal, &client)
        .await
        .map_err(ClientSubmissionError::from)?;

    println!("{}", outcome_line(&modal));
    Ok(())
}

fn listing_source(url: Option<String>, config: &AppConfig) -> HttpJobListingSource {
    let source = match url {
        Some(url) => HttpJobListingSource::new(url),
        None => HttpJobListingSource::from_config(&config.listings),
    };
    info!(url = source.url(), "loading job board");
    source
}

fn outcome_line(modal: &ApplicationModal) -> &str {
    match modal.phase() {
        ModalPhase::Success => SENT_BANNER,
        ModalPhase::Idle | ModalPhase::Submitting => modal.alert().unwrap_or(ERROR_ALERT),
    }
}

fn render_board(board: &JobBoard, include_inactive: bool) -> String {
    let postings: Vec<&JobPosting> = if include_inactive {
        board.postings().iter().collect()
    } else {
        board.active_postings().collect()
    };

    let mut out = String::from("Career Opportunities\n\n");
    if postings.is_empty() {
        out.push_str(EMPTY_BOARD);
        out.push('\n');
        return out;
    }

    for posting in postings {
        writeln!(
            out,
            "[{}] {} ({})",
            posting.id,
            posting.display_title(),
            posting.status
        )
        .expect("write posting header");
        writeln!(out, "    {} | {}", posting.industry, posting.country).expect("write location");
        writeln!(
            out,
            "    Salary: {} | Experience: {} years | Shift: {} | Type: {} | Vacancies: {} | Gender: {}",
            posting.salary,
            posting.experience,
            posting.shift,
            posting.job_type,
            posting.vacancies,
            posting.gender
        )
        .expect("write terms");
        if !posting.requirements.is_empty() {
            writeln!(out, "    Requirements: {}", posting.requirements)
                .expect("write requirements");
        }
    }
    out
}
