use retain_classifiers::io::read_customer_records;
use retain_classifiers::report::build_summary_report;
use retain_classifiers::summary::{analyze, AlertLevel, SegmentRisk, TENURE_BINS};

const CLEANED_DATA: &str = "customerID,gender,tenure,Contract,PaymentMethod,MonthlyCharges,Churn\n\
    0001,Female,1,Month-to-month,Electronic check,29.85,Yes\n\
    0002,Male,34,One year,Mailed check,56.95,No\n\
    0003,Male,2,Month-to-month,Mailed check,53.85,Yes\n\
    0004,Male,45,One year,Bank transfer (automatic),42.30,No\n\
    0005,Female,2,Month-to-month,Electronic check,70.70,Yes\n\
    0006,Female,8,Month-to-month,Electronic check,99.65,Yes\n\
    0007,Male,22,Month-to-month,Credit card (automatic),89.10,No\n\
    0008,Female,10,Month-to-month,Mailed check,29.75,No\n\
    0009,Female,28,Month-to-month,Electronic check,104.80,Yes\n\
    0010,Male,62,One year,Bank transfer (automatic),56.15,No\n\
    0011,Male,13,Month-to-month,Mailed check,49.95,No\n\
    0012,Male,16,Two year,Credit card (automatic),18.95,No\n\
    0013,Male,58,One year,Credit card (automatic),100.35,No\n\
    0014,Male,49,Month-to-month,Bank transfer (automatic),103.70,Yes\n\
    0015,Male,25,Month-to-month,Electronic check,105.50,No\n\
    0016,Female,69,Two year,Credit card (automatic),113.25,No\n\
    0017,Female,52,One year,Mailed check,20.65,No\n\
    0018,Male,71,Two year,Bank transfer (automatic),106.70,No\n\
    0019,Female,10,Month-to-month,Credit card (automatic),55.20,Yes\n\
    0020,Female,21,Month-to-month,Electronic check,90.05,No\n";

fn load() -> Vec<retain_classifiers::data_handling::CustomerRecord> {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cleaned_data.csv");
    std::fs::write(&path, CLEANED_DATA).unwrap();
    read_customer_records(&path).unwrap()
}

#[test]
fn overview_from_cleaned_csv() {
    let analysis = analyze(&load()).unwrap();
    let overview = &analysis.overview;
    assert_eq!(overview.total_customers, 20);
    assert_eq!(overview.churned_customers, 7);
    assert!((overview.churn_rate - 0.35).abs() < 1e-12);
    assert_eq!(overview.alert, AlertLevel::Critical);
}

#[test]
fn per_contract_and_payment_rates() {
    let analysis = analyze(&load()).unwrap();

    let contracts: Vec<(&str, usize, usize)> = analysis
        .by_contract
        .iter()
        .map(|s| (s.segment.as_str(), s.customers, s.churned))
        .collect();
    assert_eq!(
        contracts,
        vec![("Month-to-month", 12, 7), ("One year", 5, 0), ("Two year", 3, 0)]
    );
    let m2m = &analysis.by_contract[0];
    assert!((m2m.churn_rate - 7.0 / 12.0).abs() < 1e-12);
    assert_eq!(m2m.risk, SegmentRisk::High);
    assert_eq!(analysis.by_contract[1].risk, SegmentRisk::Low);

    let payment = |name: &str| {
        analysis
            .by_payment_method
            .iter()
            .find(|s| s.segment == name)
            .unwrap()
    };
    let electronic = payment("Electronic check");
    assert_eq!((electronic.customers, electronic.churned), (6, 4));
    assert!((electronic.churn_rate - 4.0 / 6.0).abs() < 1e-12);
    assert_eq!(payment("Mailed check").churned, 1);
    assert_eq!(payment("Credit card (automatic)").risk, SegmentRisk::Low);
    assert_eq!(payment("Bank transfer (automatic)").risk, SegmentRisk::Moderate);
}

#[test]
fn tenure_distribution_and_report() {
    let analysis = analyze(&load()).unwrap();
    let tenure = &analysis.tenure;
    assert_eq!(tenure.n_bins(), TENURE_BINS);
    assert_eq!(tenure.bin_edges[0], 1.0);
    assert_eq!(tenure.churned.iter().sum::<usize>(), 7);
    assert_eq!(tenure.retained.iter().sum::<usize>(), 13);
    // tenure 1, 2 and 2 all churned and fall in the first bin
    assert_eq!(tenure.churned[0], 3);

    let page = build_summary_report(&analysis).render();
    assert!(page.contains("Key Metrics"));
    assert!(page.contains("Churn by Payment Method"));
    assert!(page.contains("58.3%"));
}
