//! Argument lists for the two split outputs.

use std::path::Path;

/// Synthetic picture used as the video track of the audio proxy.
pub const BLACK_SOURCE: &str = "color=c=black:s=640x360:r=30";

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Copies the video stream untouched and drops every audio stream.
pub fn visual_only(input: &Path, output: &Path) -> Vec<String> {
    vec![
        "-y".into(),
        "-i".into(),
        path_arg(input),
        "-c:v".into(),
        "copy".into(),
        "-an".into(),
        path_arg(output),
    ]
}

/// Pairs a black picture with the input's first audio stream, stopping at
/// whichever ends first. Fails when the input has no audio stream.
pub fn audio_proxy(input: &Path, output: &Path) -> Vec<String> {
    vec![
        "-y".into(),
        "-i".into(),
        path_arg(input),
        "-f".into(),
        "lavfi".into(),
        "-i".into(),
        BLACK_SOURCE.into(),
        "-shortest".into(),
        "-map".into(),
        "1:v:0".into(),
        "-map".into(),
        "0:a:0".into(),
        "-c:v".into(),
        "libx264".into(),
        "-preset".into(),
        "veryfast".into(),
        "-crf".into(),
        "30".into(),
        "-c:a".into(),
        "aac".into(),
        "-b:a".into(),
        "128k".into(),
        path_arg(output),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visual_args_drop_audio_without_reencoding() {
        let args = visual_only(Path::new("/tmp/in.mp4"), Path::new("/jobs/x/out.mp4"));
        assert_eq!(args.first().map(String::as_str), Some("-y"));
        assert!(args.windows(2).any(|w| w == ["-c:v", "copy"]));
        assert!(args.contains(&"-an".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("/jobs/x/out.mp4"));
    }

    #[test]
    fn audio_proxy_maps_black_video_and_source_audio() {
        let args = audio_proxy(Path::new("/tmp/in.mp4"), Path::new("/jobs/x/audio.mp4"));
        assert!(args.windows(2).any(|w| w == ["-i", "/tmp/in.mp4"]));
        assert!(args.windows(2).any(|w| w == ["-i", BLACK_SOURCE]));
        assert!(args.windows(2).any(|w| w == ["-map", "1:v:0"]));
        assert!(args.windows(2).any(|w| w == ["-map", "0:a:0"]));
        assert!(args.contains(&"-shortest".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("/jobs/x/audio.mp4"));
    }
}
