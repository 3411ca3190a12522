use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;
use std::str::FromStr;

use retain_classifiers::config::load_evaluation_config;
use retain_classifiers::risk::{ContractType, CustomerProfile, InternetService, PaymentMethod};
use retain_cli::commands::evaluate::{format_metrics_table, run_evaluation, write_evaluation_report};
use retain_cli::commands::risk::{format_risk_report, run_risk};
use retain_cli::commands::summary::{
    format_summary, run_summary, write_summary_report, DEFAULT_DATA_PATH,
};
use retain_cli::util::{default_config_json, validate_csv_file};

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("RETAIN_LOG", "error,retain=info"))
        .init();

    let matches = Command::new("retain")
        .version(clap::crate_version!())
        .about("Customer churn risk scoring and model performance review")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("risk")
                .about("Score one customer profile with the rule-based risk model")
                .arg(
                    Arg::new("tenure")
                        .long("tenure")
                        .help("Account tenure in months (0-72)")
                        .value_parser(clap::value_parser!(u32))
                        .default_value("12"),
                )
                .arg(
                    Arg::new("monthly_charges")
                        .long("monthly-charges")
                        .help("Monthly charges in dollars (18-120)")
                        .value_parser(clap::value_parser!(f64))
                        .default_value("65.0"),
                )
                .arg(
                    Arg::new("contract")
                        .long("contract")
                        .help("Contract type: month-to-month, one-year or two-year")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .default_value("month-to-month")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("payment_method")
                        .long("payment-method")
                        .help(
                            "Payment method: electronic-check, mailed-check, \
                             bank-transfer-auto or credit-card-auto",
                        )
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .default_value("electronic-check")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("internet")
                        .long("internet")
                        .help("Internet service: none, dsl or fiber-optic")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .default_value("none")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("senior")
                        .long("senior")
                        .help("Customer is a senior citizen")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the assessment as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("evaluate")
                .about("Compare trained churn models on a held-out test set")
                .arg(
                    Arg::new("config")
                        .help("Path to evaluation JSON configuration file")
                        .required(false)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("test_data")
                        .short('d')
                        .long("test-data")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .help(
                            "Path to test data (*.csv). Overrides the test data file \
                             specified in the configuration file.",
                        )
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("report_file")
                        .short('o')
                        .long("report")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .help("File path the HTML report will be written to.")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("no_report")
                        .long("no-report")
                        .help("Disable HTML report generation.")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("sequential")
                        .long("sequential")
                        .help("Evaluate models one after another instead of in parallel.")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("summary")
                .about("Summarize churn across contract types, payment methods and tenure")
                .arg(
                    Arg::new("data")
                        .help("Path to the cleaned customer data (*.csv)")
                        .default_value(DEFAULT_DATA_PATH)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("report_file")
                        .short('o')
                        .long("report")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .help("File path the HTML summary will be written to.")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the summary as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Version {version}\n\n\
             {all-args}{after-help}",
        )
        .get_matches();

    match matches.subcommand() {
        Some(("risk", sub_m)) => handle_risk(sub_m),
        Some(("evaluate", sub_m)) => handle_evaluate(sub_m),
        Some(("summary", sub_m)) => handle_summary(sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn handle_risk(matches: &ArgMatches) -> Result<()> {
    let profile = profile_from_arguments(matches)?;
    let report = match run_risk(profile) {
        Ok(report) => report,
        Err(e) => {
            log::error!("Risk scoring failed: {:#}", e);
            std::process::exit(1)
        }
    };

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_risk_report(&report));
    }
    Ok(())
}

fn text_arg<'a>(matches: &'a ArgMatches, id: &str) -> &'a str {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .unwrap_or_default()
}

fn profile_from_arguments(matches: &ArgMatches) -> Result<CustomerProfile> {
    let text = |id| text_arg(matches, id);
    Ok(CustomerProfile {
        tenure_months: *matches.get_one::<u32>("tenure").unwrap_or(&12),
        monthly_charges: *matches.get_one::<f64>("monthly_charges").unwrap_or(&65.0),
        contract: ContractType::from_str(text("contract")).map_err(anyhow::Error::msg)?,
        payment_method: PaymentMethod::from_str(text("payment_method"))
            .map_err(anyhow::Error::msg)?,
        senior_citizen: matches.get_flag("senior"),
        internet_service: InternetService::from_str(text("internet"))
            .map_err(anyhow::Error::msg)?,
    })
}

fn handle_evaluate(matches: &ArgMatches) -> Result<()> {
    let mut config = if let Some(config_path) = matches.get_one::<PathBuf>("config") {
        eprintln!("[retain::evaluate] Using config: {:?}", config_path);
        load_evaluation_config(config_path)?
    } else {
        eprintln!("[retain::evaluate] No config file provided. Default config:");
        println!("{}", default_config_json()?);
        return Ok(());
    };

    if let Some(test_data) = matches.get_one::<String>("test_data") {
        validate_csv_file(test_data)?;
        config.test_data = test_data.clone();
    }
    if let Some(report_file) = matches.get_one::<String>("report_file") {
        config.report_file = Some(report_file.clone());
    }
    if matches.get_flag("no_report") {
        config.report_file = None;
    }
    if matches.get_flag("sequential") {
        config.parallel = false;
    }

    let run = match run_evaluation(&config) {
        Ok(run) => run,
        Err(e) => {
            log::error!("Evaluation failed: {:#}", e);
            std::process::exit(1)
        }
    };

    print!("{}", format_metrics_table(&run.evaluation)?);
    if let Some(report_file) = &config.report_file {
        write_evaluation_report(&run, report_file)?;
        eprintln!("[retain::evaluate] Report written to {}", report_file);
    }
    eprintln!(
        "[retain::evaluate] Completed evaluation of {} models on {} samples.",
        run.evaluation.results.len(),
        run.test_set.len()
    );
    Ok(())
}

fn handle_summary(matches: &ArgMatches) -> Result<()> {
    let data = matches
        .get_one::<PathBuf>("data")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));
    let analysis = match run_summary(&data) {
        Ok(analysis) => analysis,
        Err(e) => {
            log::error!("Summary failed: {:#}", e);
            std::process::exit(1)
        }
    };

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print!("{}", format_summary(&analysis));
    }
    if let Some(report_file) = matches.get_one::<String>("report_file") {
        write_summary_report(&analysis, report_file)?;
        eprintln!("[retain::summary] Report written to {}", report_file);
    }
    Ok(())
}
