//! Integration tests for chart rendering

use crate::common::{assertions, context_for, customer, sample_data, CliTestRunner, DELTA_HEADER};
use custdelta::record::{ChangeIndicator, DeltaSet};
use custdelta::report::{ChangeTally, CustomerCategory, TrendReporter, X_AXIS_TITLE, Y_AXIS_TITLE};
use custdelta::snapshot::SnapshotLoader;
use custdelta::DeltaError;
use std::fs;

#[test]
fn test_report_command_renders_chart() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    let delta = fixture
        .write_raw(
            &fixture.root().join("DeltaFile_20240315.txt"),
            &format!("{}\n3|300|Cara|557|I\n2|200|Bob|999|U\n1|100|Alice|555|D\n", DELTA_HEADER),
        )
        .unwrap();

    runner.expect_success(&["report", &delta.to_string_lossy(), "--date", "20240315"]);

    let chart = TrendReporter::chart_path(&fixture.config.plot_directory, context_for("20240315").run_date);
    assertions::assert_file_exists_and_not_empty(&chart);
    let svg = fs::read_to_string(&chart).unwrap();
    assert!(svg.contains(X_AXIS_TITLE));
    assert!(svg.contains(Y_AXIS_TITLE));
}

#[test]
fn test_report_command_explicit_output() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    let delta = fixture
        .write_raw(&fixture.root().join("delta.txt"), &format!("{}\n", DELTA_HEADER))
        .unwrap();
    let output = fixture.root().join("charts/empty.svg");

    runner.expect_success(&["report", &delta.to_string_lossy(), "--output", &output.to_string_lossy()]);
    assertions::assert_file_exists_and_not_empty(&output);
}

#[test]
fn test_report_command_missing_delta() {
    let runner = CliTestRunner::new().unwrap();
    let missing = runner.fixture().root().join("DeltaFile_20240315.txt");
    let err = runner.expect_failure(&["report", &missing.to_string_lossy()]);
    assert!(matches!(err, DeltaError::MissingInputFile { .. }));
}

#[test]
fn test_report_command_bad_indicator() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    let delta = fixture
        .write_raw(
            &fixture.root().join("delta.txt"),
            &format!("{}\n3|300|Cara|557|Z\n", DELTA_HEADER),
        )
        .unwrap();

    let err = runner.expect_failure(&["report", &delta.to_string_lossy()]);
    assert!(matches!(err, DeltaError::MalformedRecord { line: 2, .. }));
}

#[test]
fn test_tally_of_written_delta_uses_sentinel() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    let context = context_for("20240315");
    fixture
        .prepare_run(&context, &sample_data::reference_previous(), &sample_data::reference_current())
        .unwrap();
    runner.expect_success(&["run", "--date", "20240315", "--no-report"]);

    let delta = SnapshotLoader::new()
        .unwrap()
        .load_delta(&fixture.workspace.delta_output_path(&context))
        .unwrap();
    let tally = ChangeTally::from_delta(&delta, fixture.config.online_source_id);

    // Cara has source 3 (offline), Bob has source 2 (online)
    assert_eq!(tally.get(ChangeIndicator::Insert, CustomerCategory::OfflineCustomers), 1);
    assert_eq!(tally.get(ChangeIndicator::Update, CustomerCategory::OnlineCustomers), 1);
    assert_eq!(tally.bar_total(ChangeIndicator::Delete), 0);
}

#[test]
fn test_tally_with_custom_sentinel() {
    let delta = DeltaSet {
        records: vec![
            custdelta::record::ClassifiedRecord::new(customer(7, 1, "A", "1"), ChangeIndicator::Insert),
            custdelta::record::ClassifiedRecord::new(customer(2, 2, "B", "2"), ChangeIndicator::Insert),
        ],
    };
    let tally = ChangeTally::from_delta(&delta, 7);
    assert_eq!(tally.get(ChangeIndicator::Insert, CustomerCategory::OnlineCustomers), 1);
    assert_eq!(tally.get(ChangeIndicator::Insert, CustomerCategory::OfflineCustomers), 1);
    assert_eq!(tally.categories()[0], CustomerCategory::OnlineCustomers);
}
