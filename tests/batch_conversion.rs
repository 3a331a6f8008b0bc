//! End-to-end batch runs over a temporary input tree.

use std::fs;
use std::path::Path;

use brainbin::config::BrainbinConfig;
use brainbin::pipeline::{run_batch, BatchConverter, ConversionError, ConversionOutcome};
use brainbin::serialization::{decompress_gzip, GeometryContainer, StatisticContainer};
use brainbin::structures::{
    Analysis, ConfigurationError, FormatError, Hemisphere, Statistic, StatisticMetadataTable,
};
use byteorder::{BigEndian, WriteBytesExt};

const N_VERTICES: usize = 4;

fn surface_bytes(magic: [u8; 3]) -> Vec<u8> {
    let vertices = [[0.0f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
    let faces = [[0u32, 1, 2], [0, 1, 3]];

    let mut bytes = magic.to_vec();
    bytes.extend_from_slice(b"created by test\n\n");
    bytes.write_u32::<BigEndian>(vertices.len() as u32).unwrap();
    bytes.write_u32::<BigEndian>(faces.len() as u32).unwrap();
    for v in vertices.iter().flatten() {
        bytes.write_f32::<BigEndian>(*v).unwrap();
    }
    for i in faces.iter().flatten() {
        bytes.write_u32::<BigEndian>(*i).unwrap();
    }
    bytes
}

fn dat_bytes(samples: &[f32]) -> Vec<u8> {
    samples.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn write_file(path: &Path, bytes: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, bytes).unwrap();
}

fn config_for(input: &Path, output: &Path) -> BrainbinConfig {
    let mut config = BrainbinConfig::default();
    config.paths.input_dir = input.to_path_buf();
    config.paths.output_dir = output.join("web");
    config.conversion.n_vertices = N_VERTICES;
    config
}

#[test]
fn test_batch_converts_present_inputs_and_skips_the_rest() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let mut config = config_for(input.path(), output.path());
    config.conversion.hemispheres = vec!["lh".to_string()];
    config.conversion.analyses = vec!["des1".to_string()];

    write_file(&input.path().join("lh.pial"), &surface_bytes([0xFF, 0xFF, 0xFE]));
    let sigma2 = [1.0, f32::NAN, 3.0, 2.0];
    write_file(
        &input.path().join("results_lh_des1").join("sigma2.dat"),
        &dat_bytes(&sigma2),
    );

    let report = run_batch(&config).unwrap();

    // geometry + sigma2 converted; conT, conTlp and beta are missing
    assert_eq!(report.converted_count(), 2);
    assert_eq!(report.skipped_count(), 3);
    assert_eq!(report.failed_count(), 0);

    let web = output.path().join("web");
    let geometry_gz = fs::read(web.join("lh_geometry.bin.gz")).unwrap();
    let geometry = GeometryContainer::from_bytes(&decompress_gzip(&geometry_gz).unwrap()).unwrap();
    assert_eq!(geometry.n_vertices(), 4);
    assert_eq!(geometry.n_faces(), 2);
    assert_eq!(geometry.vertices[2], [0.0, 1.0, 0.0]);

    let stat_gz = fs::read(web.join("lh_des1_sigma2.bin.gz")).unwrap();
    let stat = StatisticContainer::from_bytes(&decompress_gzip(&stat_gz).unwrap()).unwrap();
    assert_eq!(stat.n_volumes(), 1);
    assert_eq!(stat.nan_count, 1);
    assert_eq!((stat.global_range.min, stat.global_range.max), (1.0, 3.0));

    let sidecar: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(web.join("lh_des1_sigma2.json")).unwrap())
            .unwrap();
    assert_eq!(sidecar["name"], "lh_des1_sigma2");
    assert_eq!(sidecar["display_name"], "Residual Variance (DES1)");
    assert_eq!(sidecar["hemisphere"], "left");

    assert!(!web.join("lh_des1_conT.bin.gz").exists());
    let leftovers: Vec<_> = fs::read_dir(&web)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_bad_surface_magic_fails_without_output() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let config = config_for(input.path(), output.path());
    write_file(&input.path().join("rh.pial"), &surface_bytes([0xFF, 0xFF, 0xFF]));

    let outcome = BatchConverter::new(&config).convert_geometry(Hemisphere::Right);

    assert!(matches!(
        outcome,
        ConversionOutcome::Failed {
            error: ConversionError::Format(FormatError::InvalidMagic { .. }),
            ..
        }
    ));
    assert!(!config.paths.geometry_output_path(Hemisphere::Right).exists());
}

#[test]
fn test_indivisible_statistic_fails_without_output() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let config = config_for(input.path(), output.path());
    write_file(
        &input.path().join("results_lh_des2").join("conT.dat"),
        &dat_bytes(&[0.5; N_VERTICES * 5 + 1]),
    );

    let outcome =
        BatchConverter::new(&config).convert_statistic(Hemisphere::Left, Analysis::Design2, Statistic::TStat);

    assert!(matches!(
        outcome,
        ConversionOutcome::Failed {
            error: ConversionError::Format(FormatError::SampleCountMismatch { .. }),
            ..
        }
    ));
    let (container, sidecar) = config.paths.statistic_output_paths(
        Hemisphere::Left,
        Analysis::Design2,
        Statistic::TStat,
    );
    assert!(!container.exists());
    assert!(!sidecar.exists());
}

#[test]
fn test_failure_does_not_stop_other_conversions() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let mut config = config_for(input.path(), output.path());
    config.conversion.analyses = vec!["compare".to_string()];
    write_file(&input.path().join("lh.pial"), b"\x00\x01 truncated");
    write_file(&input.path().join("rh.pial"), &surface_bytes([0xFF, 0xFF, 0xFE]));
    write_file(
        &input.path().join("results_rh_compare").join("Chi2.dat"),
        &dat_bytes(&[2.0, 4.0, 6.0, 8.0]),
    );

    let report = run_batch(&config).unwrap();

    assert_eq!(report.failed_count(), 1);
    assert_eq!(report.converted_count(), 2);
    assert!(report.has_failures());
    assert!(config.paths.geometry_output_path(Hemisphere::Right).exists());
    assert!(output.path().join("web").join("rh_compare_Chi2.json").exists());
}

#[test]
fn test_sidecar_write_failure_removes_container() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let config = config_for(input.path(), output.path());
    write_file(
        &input.path().join("results_lh_des1").join("sigma2.dat"),
        &dat_bytes(&[1.0, 2.0, 3.0, 4.0]),
    );
    let (container, sidecar) = config.paths.statistic_output_paths(
        Hemisphere::Left,
        Analysis::Design1,
        Statistic::Sigma2,
    );
    // a non-empty directory in place of the sidecar cannot be replaced by a file
    write_file(&sidecar.join("occupied"), b"x");

    let outcome =
        BatchConverter::new(&config).convert_statistic(Hemisphere::Left, Analysis::Design1, Statistic::Sigma2);

    assert!(matches!(
        outcome,
        ConversionOutcome::Failed {
            error: ConversionError::Write { .. },
            ..
        }
    ));
    assert!(!container.exists());
    assert!(!sidecar.is_file());
}

#[test]
fn test_volume_count_warning_is_reported() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let config = config_for(input.path(), output.path());
    // conT expects 5 volumes; write 2
    write_file(
        &input.path().join("results_lh_des1").join("conT.dat"),
        &dat_bytes(&[1.0; N_VERTICES * 2]),
    );

    let outcome =
        BatchConverter::new(&config).convert_statistic(Hemisphere::Left, Analysis::Design1, Statistic::TStat);

    match outcome {
        ConversionOutcome::Converted(report) => {
            let warning = report.volume_count_warning.unwrap();
            assert_eq!((warning.expected, warning.derived), (5, 2));
            assert_eq!(report.outputs.len(), 2);
            let gz = fs::read(&report.outputs[0]).unwrap();
            let container =
                StatisticContainer::from_bytes(&decompress_gzip(&gz).unwrap()).unwrap();
            assert_eq!(container.n_volumes(), 2);
        }
        other => panic!("expected conversion, got {:?}", other),
    }
}

#[test]
fn test_missing_metadata_fails_before_writing() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let config = config_for(input.path(), output.path());
    write_file(
        &input.path().join("results_lh_des1").join("beta.dat"),
        &dat_bytes(&[0.0; N_VERTICES * 23]),
    );
    let empty = StatisticMetadataTable::default();

    let outcome = BatchConverter::new(&config)
        .with_metadata_table(&empty)
        .convert_statistic(Hemisphere::Left, Analysis::Design1, Statistic::Beta);

    assert!(matches!(
        outcome,
        ConversionOutcome::Failed {
            error: ConversionError::Configuration(ConfigurationError::MissingMetadata { .. }),
            ..
        }
    ));
    assert!(!output.path().join("web").exists());
}

#[test]
fn test_stat_file_prefix() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let mut config = config_for(input.path(), output.path());
    config.paths.stat_file_prefix = "blmm_vox_".to_string();
    write_file(
        &input.path().join("results_rh_compare").join("blmm_vox_Chi2lp.dat"),
        &dat_bytes(&[0.1, 1.5, f32::NAN, 3.0]),
    );

    let outcome = BatchConverter::new(&config).convert_statistic(
        Hemisphere::Right,
        Analysis::Compare,
        Statistic::Chi2lp,
    );

    assert!(matches!(outcome, ConversionOutcome::Converted(_)));
}

#[test]
fn test_unknown_identifier_aborts_batch() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let mut config = config_for(input.path(), output.path());
    config.conversion.hemispheres = vec!["both".to_string()];

    assert!(matches!(
        run_batch(&config),
        Err(ConversionError::Configuration(ConfigurationError::UnknownIdentifier { .. }))
    ));
}
