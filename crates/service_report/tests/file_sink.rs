//! File sink output formats.

use std::fs;

use sampler_core::kernel::SamplePoint;
use sampler_core::ExecutionMode;
use sampler_scaling::{ScalingLaw, ScalingLawParameters, ScalingRecord, ScalingReport};
use service_report::{EstimateSummary, FileWriter, Report, ReportSink};

fn scaling_report() -> ScalingReport {
    ScalingReport {
        law: ScalingLaw::Gustafson,
        parameters: ScalingLawParameters::default(),
        base_samples: 10_000,
        serial_time: 0.5,
        records: vec![
            ScalingRecord {
                worker_count: 2,
                achieved_speedup: 1.5,
                theoretical_speedup: 2.0,
            },
            ScalingRecord {
                worker_count: 3,
                achieved_speedup: 2.25,
                theoretical_speedup: 3.0,
            },
        ],
    }
}

#[test]
fn test_scaling_csv_header_and_rows() {
    let dir = tempfile::tempdir().unwrap();
    let writer = FileWriter::new(dir.path()).unwrap();
    let report = scaling_report();

    let path = writer
        .write(&Report::Scaling {
            use_case: "pi",
            report: &report,
        })
        .unwrap();

    assert_eq!(path.file_name().unwrap(), "pi_gustafson_scaling.csv");
    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], sampler_scaling::CSV_HEADER.join(","));
    assert_eq!(lines[0], "worker_count,achieved_speedup,theoretical_speedup");
    assert_eq!(lines[1], "2,1.5,2.0");
    assert_eq!(lines[2], "3,2.25,3.0");
    assert_eq!(lines.len(), 3);
}

#[test]
fn test_point_trace_has_one_line_per_sample() {
    let dir = tempfile::tempdir().unwrap();
    let writer = FileWriter::new(dir.path()).unwrap();
    let points = vec![
        SamplePoint { x: 0.5, y: 0.25 },
        SamplePoint {
            x: 0.123_456_789,
            y: 1.0,
        },
    ];

    let path = writer
        .write(&Report::PointTrace {
            use_case: "pi",
            points: &points,
        })
        .unwrap();

    let content = fs::read_to_string(path).unwrap();
    assert_eq!(content, "0.5000000 0.2500000\n0.1234568 1.0000000\n");
}

#[test]
fn test_path_trace_numbers_paths_from_one() {
    let dir = tempfile::tempdir().unwrap();
    let writer = FileWriter::new(dir.path()).unwrap();
    let paths = vec![vec![100.0, 101.5], vec![100.0, 99.25]];

    let path = writer
        .write(&Report::PathTrace {
            symbol: "AAPL",
            paths: &paths,
        })
        .unwrap();

    assert_eq!(path.file_name().unwrap(), "AAPL_paths.txt");
    let content = fs::read_to_string(path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "1, 100.0000000, 101.5000000");
    assert_eq!(lines[1], "2, 100.0000000, 99.2500000");
}

#[test]
fn test_estimate_json_round_trips_and_is_logged() {
    let dir = tempfile::tempdir().unwrap();
    let writer = FileWriter::new(dir.path()).unwrap();
    let summary = EstimateSummary {
        use_case: "pi".to_string(),
        value: 3.1416,
        reference: Some(std::f64::consts::PI),
        lower_quantile: None,
        upper_quantile: None,
        samples_drawn: 1_000_000,
        worker_count: 4,
        mode: ExecutionMode::Serial,
        elapsed_seconds: 0.1234567,
        generated_at: "2024-01-01T00:00:00+00:00".to_string(),
    };

    writer.send(&Report::Estimate(&summary)).unwrap();

    let written = writer.written_files();
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].kind, "estimate");
    assert!(written[0].size > 0);

    let parsed: EstimateSummary =
        serde_json::from_str(&fs::read_to_string(&written[0].path).unwrap()).unwrap();
    assert_eq!(parsed, summary);
}
