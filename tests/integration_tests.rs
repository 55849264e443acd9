use std::fs;

use turbidity_monthly::types::DroppedYear;
use turbidity_monthly::{PipelineConfig, PipelineError, run, run_with};

const FIXTURE: &[u8] = include_bytes!("fixtures/sample_turbidity.csv");
const EPS: f64 = 1e-9;

fn config_in(dir: &tempfile::TempDir) -> PipelineConfig {
    let input = dir.path().join("samples.csv");
    fs::write(&input, FIXTURE).unwrap();
    PipelineConfig {
        input_path: input,
        output_path: dir.path().join("processed_turbidity_data.csv"),
        ..Default::default()
    }
}

#[test]
fn test_full_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);

    let result = run(&config).expect("pipeline run failed");
    let summary = &result.summary;

    assert_eq!(summary.rows.total_rows, 41);
    assert_eq!(summary.rows.missing_fields, 2);
    assert_eq!(summary.rows.invalid_dates, 2);
    assert_eq!(summary.rows.invalid_turbidity, 0);
    assert_eq!(summary.rows.clean_rows, 37);
    assert_eq!(summary.monthly_aggregates, 27);

    assert_eq!(summary.retained_years, vec![2019, 2021]);
    assert_eq!(
        summary.dropped_years,
        vec![DroppedYear {
            year: 2020,
            missing_months: 6
        }]
    );
    assert_eq!(summary.output_records, 24);
    assert_eq!(summary.interpolated_records, 3);

    // April and September 2019 sit between known neighbours.
    let apr = &result.records[3];
    assert_eq!((apr.year, apr.month, apr.month_name), (2019, 4, "Apr"));
    assert!(apr.interpolated);
    assert!((apr.turbidity - 4.0).abs() < EPS);
    let sep = &result.records[8];
    assert!(sep.interpolated);
    assert!((sep.turbidity - 9.0).abs() < EPS);

    // January 2021 has no earlier neighbour and copies February.
    let jan = &result.records[12];
    assert_eq!((jan.year, jan.month), (2021, 1));
    assert!(jan.interpolated);
    assert!((jan.turbidity - 5.0).abs() < EPS);
    assert!(!result.records[13].interpolated);
}

#[test]
fn test_output_file_layout() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);
    run(&config).unwrap();

    let content = fs::read_to_string(&config.output_path).unwrap();
    let lines: Vec<_> = content.lines().collect();

    assert_eq!(lines.len(), 25);
    assert_eq!(lines[0], "Year,Month,Turbidity,Interpolated,MonthName");
    assert_eq!(lines[1], "2019,1,1.0,False,Jan");
    assert_eq!(lines[4], "2019,4,4.0,True,Apr");
    assert_eq!(lines[13], "2021,1,5.0,True,Jan");
    assert_eq!(lines[24], "2021,12,30.0,False,Dec");
    assert!(!content.contains("2020,"));
}

#[test]
fn test_every_emitted_year_has_twelve_months() {
    let dir = tempfile::tempdir().unwrap();
    let result = run(&config_in(&dir)).unwrap();

    for year in &result.summary.retained_years {
        let months: Vec<u32> = result
            .records
            .iter()
            .filter(|r| r.year == *year)
            .map(|r| r.month)
            .collect();
        assert_eq!(months, (1..=12).collect::<Vec<_>>());

        let filled = result
            .records
            .iter()
            .filter(|r| r.year == *year && r.interpolated)
            .count();
        assert!(filled <= 3);
    }
}

#[test]
fn test_rerun_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);

    run(&config).unwrap();
    let first = fs::read(&config.output_path).unwrap();
    run(&config).unwrap();
    let second = fs::read(&config.output_path).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_two_year_keep_and_drop() {
    // 2022 misses Mar and Oct; 2023 only has Jan..Jul.
    let mut data = String::from("Sample Date,Turbidity (NTU)\n");
    for month in (1..=12).filter(|m| *m != 3 && *m != 10) {
        data.push_str(&format!("{month}/20/2022,{month}.0 NTU\n"));
    }
    for month in 1..=7 {
        data.push_str(&format!("{month}/20/2023,0.5\n"));
    }

    let mut buf = Vec::new();
    let result = run_with(&PipelineConfig::default(), data.as_bytes(), &mut buf).unwrap();

    assert_eq!(result.summary.retained_years, vec![2022]);
    assert_eq!(
        result.summary.dropped_years,
        vec![DroppedYear {
            year: 2023,
            missing_months: 5
        }]
    );
    assert_eq!(result.records.len(), 12);
    assert_eq!(result.records.iter().filter(|r| r.interpolated).count(), 2);

    let text = String::from_utf8(buf).unwrap();
    assert!(text.contains("2022,3,3.0,True,Mar"));
    assert!(!text.contains("2023"));
}

#[test]
fn test_missing_input_file_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let config = PipelineConfig {
        input_path: dir.path().join("absent.csv"),
        output_path: dir.path().join("out.csv"),
        ..Default::default()
    };

    let err = run(&config).unwrap_err();
    assert!(matches!(err, PipelineError::Io { .. }));
    assert!(!config.output_path.exists());
}

#[test]
fn test_no_usable_rows_writes_header_only() {
    let mut buf = Vec::new();
    let data = "Sample Date,Turbidity (NTU)\nnope,1\n01/01/2020,N/A\n";
    let result = run_with(&PipelineConfig::default(), data.as_bytes(), &mut buf).unwrap();

    assert!(result.records.is_empty());
    assert!(result.summary.retained_years.is_empty());
    assert_eq!(
        String::from_utf8(buf).unwrap(),
        "Year,Month,Turbidity,Interpolated,MonthName\n"
    );
}
