//! # Pipeline Tests
//!
//! End-to-end runs from a WAV file on disk to an STL file on disk.

use std::path::PathBuf;

use hound::{SampleFormat, WavSpec, WavWriter};
use wavemesh::audio::DecodeError;
use wavemesh::core::{stl, MeshError};
use wavemesh::{convert_file, MeshConfig, PipelineError, StlFormat};

fn temp_path(tag: &str, ext: &str) -> PathBuf {
    let id = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("test_pipeline_{tag}_{id}.{ext}"))
}

/// Writes a mono float WAV of `len` samples of a half-scale sine.
fn write_sine(path: &PathBuf, len: usize) {
    let spec = WavSpec {
        channels: 1,
        sample_rate: 8_000,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec).unwrap();
    for i in 0..len {
        let t = i as f32 / 8_000.0;
        writer
            .write_sample(0.5 * (2.0 * std::f32::consts::PI * 440.0 * t).sin())
            .unwrap();
    }
    writer.finalize().unwrap();
}

/// Test: default settings produce an 89 x 89 field in binary STL.
#[test]
fn test_wav_to_binary_stl() {
    let input = temp_path("sine", "wav");
    let output = temp_path("sine", "stl");
    write_sine(&input, 12_000);

    let report = convert_file(&input, &output, &MeshConfig::default()).unwrap();
    assert_eq!(report.rows, 89);
    assert_eq!(report.columns, 89);
    assert_eq!(report.boxes, 7921);
    assert_eq!(report.triangles, 7921 * 12);
    assert_eq!(report.dropped_samples, 79);

    let on_disk = stl::read_binary_triangle_count(&output).unwrap();
    assert_eq!(on_disk as usize, report.triangles);
    let size = std::fs::metadata(&output).unwrap().len();
    assert_eq!(size, 84 + 50 * report.triangles as u64);

    // Heights stay within base + gain * [-0.5, 0.5].
    let bounds = report.bounds.unwrap();
    assert!(bounds.max[2] <= 1.0 + 100.0 * 0.5 + 1e-3);
    assert!(bounds.max[2] > 1.0);

    std::fs::remove_file(&input).ok();
    std::fs::remove_file(&output).ok();
}

/// Test: a small point count and ASCII output.
#[test]
fn test_wav_to_ascii_stl() {
    let input = temp_path("ascii", "wav");
    let output = temp_path("ascii", "stl");
    write_sine(&input, 500);

    let config = MeshConfig {
        target_point_count: 16,
        output_format: StlFormat::Ascii,
        ..MeshConfig::default()
    };
    let report = convert_file(&input, &output, &config).unwrap();
    assert_eq!(report.boxes, 16);
    assert_eq!(report.dropped_samples, 0);

    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("solid"));
    assert_eq!(text.matches("facet normal").count(), 16 * 12);

    std::fs::remove_file(&input).ok();
    std::fs::remove_file(&output).ok();
}

/// Test: a missing input fails before any output exists.
#[test]
fn test_missing_input() {
    let input = temp_path("missing", "wav");
    let output = temp_path("missing", "stl");

    let err = convert_file(&input, &output, &MeshConfig::default()).unwrap_err();
    assert!(matches!(err, PipelineError::Decode(DecodeError::NotFound(_))));
    assert!(!output.exists());
}

/// Test: an unsupported extension is reported as such.
#[test]
fn test_unsupported_input() {
    let input = temp_path("flac", "flac");
    let output = temp_path("flac", "stl");
    std::fs::write(&input, b"fLaC").unwrap();

    let err = convert_file(&input, &output, &MeshConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Decode(DecodeError::UnsupportedFormat { .. })
    ));
    assert!(!output.exists());

    std::fs::remove_file(&input).ok();
}

/// Test: invalid settings are rejected without writing a file.
#[test]
fn test_invalid_config_writes_nothing() {
    let input = temp_path("badcfg", "wav");
    let output = temp_path("badcfg", "stl");
    write_sine(&input, 100);

    let config = MeshConfig {
        unit_spacing: 0.0,
        ..MeshConfig::default()
    };
    let err = convert_file(&input, &output, &config).unwrap_err();
    assert!(matches!(err, PipelineError::Mesh(MeshError::InvalidConfig(_))));
    assert!(!output.exists());

    std::fs::remove_file(&input).ok();
}
