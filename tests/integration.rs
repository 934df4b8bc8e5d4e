#[cfg(test)]
mod tests {
    use assert_fs::prelude::*;
    use assert_fs::TempDir;
    use framiq::{
        AspectRatioSpec, BatchPipeline, BorderPercent, ImageCrateCodec, ProcessConfig, RunOutcome,
    };
    use image::{GenericImageView, Rgb, RgbImage};

    fn ratio(w: f64, h: f64) -> AspectRatioSpec {
        AspectRatioSpec::new(w, h).unwrap()
    }

    fn border(percent: f64) -> BorderPercent {
        BorderPercent::new(percent).unwrap()
    }

    fn pipeline() -> BatchPipeline<ImageCrateCodec> {
        BatchPipeline::new(ImageCrateCodec::new(&ProcessConfig::default()))
    }

    #[test]
    fn test_frame_single_image() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.child("photo.JPG");
        RgbImage::from_pixel(120, 90, Rgb([0, 0, 0]))
            .save_with_format(input.path(), image::ImageFormat::Jpeg)
            .unwrap();

        let pipeline = pipeline();
        let outcome = pipeline.process_single_image(input.path(), ratio(4.0, 5.0), border(10.0));

        assert_eq!(outcome, RunOutcome::Completed);
        let output = temp_dir.child("photo_framiq.JPG");
        assert!(output.path().exists());

        // Longest side 120 on a 4:5 canvas -> 96x120, plus 10% -> 106x132.
        let framed = image::open(output.path()).unwrap();
        assert_eq!(framed.dimensions(), (106, 132));

        let corner = framed.get_pixel(0, 0);
        assert!(corner.0[0] > 240 && corner.0[1] > 240 && corner.0[2] > 240);
        let center = framed.get_pixel(53, 66);
        assert!(center.0[0] < 20);
    }

    #[test]
    fn test_batch_directory() {
        let input_dir = TempDir::new().unwrap();
        let output_dir = TempDir::new().unwrap();
        let target = output_dir.child("framed");

        RgbImage::new(400, 300).save(input_dir.child("a.png").path()).unwrap();
        RgbImage::new(300, 400).save(input_dir.child("b.jpg").path()).unwrap();
        RgbImage::new(50, 50).save(input_dir.child("c.bmp").path()).unwrap();
        input_dir.child("notes.txt").write_str("not an image").unwrap();
        input_dir.child("broken.jpg").write_binary(b"garbage").unwrap();

        let pipeline = pipeline();
        let outcome = pipeline.start(input_dir.path(), target.path(), ratio(1.0, 1.0), border(0.0));

        assert_eq!(outcome, RunOutcome::Completed);
        let state = pipeline.snapshot();
        assert_eq!(state.total_count, 4);
        assert_eq!(state.processed_count, 4);
        assert_eq!(state.processed_files.len(), 3);
        assert_eq!(state.skipped_files, vec!["broken.jpg".to_string()]);
        assert!(!state.processed_files.contains(&"notes.txt".to_string()));

        assert_eq!(image::open(target.child("a.png").path()).unwrap().dimensions(), (400, 400));
        assert_eq!(image::open(target.child("b.jpg").path()).unwrap().dimensions(), (400, 400));
        assert_eq!(image::open(target.child("c.bmp").path()).unwrap().dimensions(), (50, 50));
        assert!(!target.child("notes.txt").path().exists());
        assert!(!target.child("broken.jpg").path().exists());
    }

    #[test]
    fn test_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let pipeline = pipeline();

        let outcome = pipeline.process_single_image(
            temp_dir.child("nonexistent.jpg").path(),
            ratio(1.0, 1.0),
            border(0.0),
        );

        assert_eq!(outcome, RunOutcome::Completed);
        assert_eq!(pipeline.snapshot().skipped_files, vec!["nonexistent.jpg".to_string()]);
    }
}
