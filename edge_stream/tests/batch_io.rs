mod common;

use common::{noise_pixels, reference_edges, rgb_image};
use edge_stream::batch::{collect_inputs, output_path_for, process_image_file, run_batch};
use edge_stream::config::BatchConfig;
use edge_stream::frame_io::load_packed;
use edge_stream::{EdgePipeline, ExecutionMode, PipelineConfig};
use std::path::Path;

fn write_png(dir: &Path, name: &str, height: usize, width: usize, seed: u64) {
    let pixels = noise_pixels(height, width, seed);
    rgb_image(height, width, &pixels).save(dir.join(name)).unwrap();
}

fn config_for(input: &Path, output: &Path, mode: ExecutionMode) -> BatchConfig {
    BatchConfig {
        input_dir: input.to_path_buf(),
        output_dir: output.to_path_buf(),
        workers: 3,
        pipeline: PipelineConfig { mode, channel_capacity: 16 },
        ..BatchConfig::default()
    }
}

#[test]
fn collects_only_accepted_extensions_in_order() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "b.png", 4, 4, 1);
    write_png(dir.path(), "a.PNG", 4, 4, 2);
    std::fs::write(dir.path().join("notes.txt"), "not an image").unwrap();
    std::fs::create_dir(dir.path().join("nested.png")).unwrap();

    let inputs = collect_inputs(dir.path(), &BatchConfig::default().extensions).unwrap();
    let names: Vec<_> = inputs.iter().map(|p| p.file_name().unwrap().to_string_lossy().into_owned()).collect();
    assert_eq!(names, vec!["a.PNG", "b.png"]);
}

#[tokio::test]
async fn single_file_round_trip_matches_reference() {
    let input_dir = tempfile::tempdir().unwrap();
    let output_dir = tempfile::tempdir().unwrap();
    let (height, width) = (13, 21);
    let pixels = noise_pixels(height, width, 42);
    let input = input_dir.path().join("frame.png");
    rgb_image(height, width, &pixels).save(&input).unwrap();

    let frame = load_packed(&input).unwrap();
    assert_eq!((frame.geometry.height, frame.geometry.width), (height, width));

    let output = output_path_for(&input, output_dir.path(), "out_edge_");
    let metrics = process_image_file(&EdgePipeline::default(), &input, &output).await.unwrap();
    assert_eq!(metrics.pixels_processed, height * width);

    let edges = image::open(&output).unwrap().to_luma8();
    assert_eq!(edges.dimensions(), ((width - 2) as u32, (height - 2) as u32));
    assert_eq!(edges.into_raw(), reference_edges(height, width, &pixels));
}

#[tokio::test]
async fn batch_skips_broken_items_and_keeps_going() {
    let input_dir = tempfile::tempdir().unwrap();
    let output_root = tempfile::tempdir().unwrap();
    let output_dir = output_root.path().join("edges");

    write_png(input_dir.path(), "one.png", 10, 12, 1);
    write_png(input_dir.path(), "two.png", 7, 30, 2);
    write_png(input_dir.path(), "tiny.png", 2, 9, 3);
    std::fs::write(input_dir.path().join("broken.png"), b"definitely not a png").unwrap();

    for mode in [ExecutionMode::Sequential, ExecutionMode::Staged] {
        let config = config_for(input_dir.path(), &output_dir, mode);
        let report = run_batch(&config).await.unwrap();

        assert_eq!(report.images_processed, 3, "{mode:?}");
        assert_eq!(report.images_failed, 1, "{mode:?}");
        assert!(report.failures[0].0.ends_with("broken.png"));
        assert_eq!(report.total_pixels, 10 * 12 + 7 * 30 + 2 * 9);

        assert!(output_dir.join("out_edge_one.png").exists());
        assert!(output_dir.join("out_edge_two.png").exists());
        assert!(!output_dir.join("out_edge_tiny.png").exists());
        let two = image::open(output_dir.join("out_edge_two.png")).unwrap();
        assert_eq!((two.width(), two.height()), (28, 5));
    }
}

#[tokio::test]
async fn empty_directory_is_not_an_error() {
    let input_dir = tempfile::tempdir().unwrap();
    let output_dir = tempfile::tempdir().unwrap();
    let report = run_batch(&config_for(input_dir.path(), output_dir.path(), ExecutionMode::Sequential))
        .await
        .unwrap();
    assert_eq!(report.images_processed, 0);
    assert_eq!(report.end_to_end_throughput_mpps(), 0.0);
}

#[tokio::test]
async fn missing_input_directory_aborts() {
    let output_dir = tempfile::tempdir().unwrap();
    let missing = output_dir.path().join("does-not-exist");
    let err = run_batch(&config_for(&missing, output_dir.path(), ExecutionMode::Sequential))
        .await
        .unwrap_err();
    assert!(matches!(err, edge_stream::EdgeError::Io(_)));
}
