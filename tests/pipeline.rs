use std::path::Path;

use audiobook::{
    load_paragraphs, AudiobookConfig, AudiobookConfigBuilder, AudiobookError, AudiobookGenerator,
    Fragment, PauseConfig, SynthesisEngine, SynthesisResult,
};

const RATE: u32 = 1000;

/// Deterministic stand-in for a TTS engine: ten samples per character at a
/// constant amplitude, recording every text it was asked to speak.
#[derive(Default)]
struct ToneEngine {
    spoken: Vec<String>,
    fail_on: Option<String>,
}

impl SynthesisEngine for ToneEngine {
    type SynthesisParams = i16;
    type ModelParams = ();

    fn load_model_with_params(
        &mut self,
        _model_path: &Path,
        _params: (),
    ) -> Result<(), Box<dyn std::error::Error>> {
        Ok(())
    }

    fn unload_model(&mut self) {}

    fn synthesize(
        &mut self,
        text: &str,
        params: Option<i16>,
    ) -> Result<SynthesisResult, Box<dyn std::error::Error>> {
        if self.fail_on.as_deref() == Some(text) {
            return Err(format!("cannot say {text:?}").into());
        }
        self.spoken.push(text.to_string());
        Ok(SynthesisResult {
            samples: vec![params.unwrap_or(1000); text.chars().count() * 10],
            sample_rate: RATE,
        })
    }
}

fn read_wav(path: &Path) -> (hound::WavSpec, Vec<i16>) {
    let mut reader = hound::WavReader::open(path).unwrap();
    let spec = reader.spec();
    let samples = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    (spec, samples)
}

#[test]
fn writes_finished_wav_with_boundary_pauses() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("book.wav");
    let paragraphs = ["Dr. Smith had 3 cats, and he loved them.", "The end."];

    let mut generator = AudiobookGenerator::new(ToneEngine::default(), AudiobookConfig::default());
    generator.generate(&paragraphs, &output, None).unwrap();

    let (spec, samples) = read_wav(&output);
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(spec.sample_rate, RATE);

    // Speech: (27 + 17 + 7) chars * 10 samples.
    // Pauses: comma 200, sentence+paragraph 1500, sentence+paragraph 1500.
    assert_eq!(samples.len(), 510 + 200 + 1500 + 1500);

    // Fades reach silence at both ends.
    assert_eq!(samples[0], 0);
    assert_eq!(*samples.last().unwrap(), 0);
    // The comma pause after the first fragment is silent.
    assert!(samples[270..470].iter().all(|&s| s == 0));
    // Normalized just below full scale.
    let peak = samples.iter().map(|&s| (s as i32).abs()).max().unwrap();
    assert!((32380..=32400).contains(&peak), "peak was {peak}");

    assert_eq!(
        generator.engine().spoken,
        vec!["Doctor Smith had three cats", "and he loved them", "The end"]
    );
}

#[test]
fn fragments_carry_boundary_flags() {
    let generator = AudiobookGenerator::new(ToneEngine::default(), AudiobookConfig::default());
    let fragments = generator.fragments(&["One sentence.", "Another one."]);
    assert_eq!(
        fragments,
        vec![
            Fragment {
                text: "One sentence".to_string(),
                end_sentence: true,
                end_paragraph: true,
            },
            Fragment {
                text: "Another one".to_string(),
                end_sentence: true,
                end_paragraph: true,
            },
        ]
    );
}

#[test]
fn blank_document_is_fatal_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("book.wav");

    let mut generator = AudiobookGenerator::new(ToneEngine::default(), AudiobookConfig::default());
    let err = generator.generate(&["   ", "...", ", , ,"], &output, None).unwrap_err();

    assert!(matches!(err, AudiobookError::EmptyFragments));
    assert!(!output.exists());
    assert!(generator.engine().spoken.is_empty());
}

#[test]
fn no_paragraphs_is_an_extraction_failure() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("book.wav");
    let paragraphs: Vec<String> = Vec::new();

    let mut generator = AudiobookGenerator::new(ToneEngine::default(), AudiobookConfig::default());
    let err = generator.generate(&paragraphs, &output, None).unwrap_err();

    assert!(matches!(err, AudiobookError::NoText));
    assert!(!output.exists());
}

#[test]
fn synthesis_failure_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("book.wav");
    let engine = ToneEngine {
        fail_on: Some("and he loved them".to_string()),
        ..Default::default()
    };

    let mut generator = AudiobookGenerator::new(engine, AudiobookConfig::default());
    let err = generator
        .generate(&["Dr. Smith had 3 cats, and he loved them."], &output, None)
        .unwrap_err();

    assert!(matches!(err, AudiobookError::Synthesis { index: 1, .. }));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn configured_pauses_and_params_are_used() {
    let config = AudiobookConfigBuilder::default()
        .pauses(PauseConfig {
            comma_ms: 0,
            sentence_ms: 100,
            paragraph_ms: 0,
        })
        .build()
        .unwrap();

    let mut generator = AudiobookGenerator::new(ToneEngine::default(), config).with_params(-500i16);
    let audio = generator.render(&["Yes, no."]).unwrap();

    // "Yes" + "no" = 50 samples, then one 100 ms sentence pause.
    assert_eq!(audio.len(), 50 + 100);
    assert!(audio.samples().iter().all(|&s| s <= 0));
}

#[test]
fn text_document_to_wav() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("story.txt");
    let output = dir.path().join("story.wav");
    std::fs::write(
        &input,
        "Chapter 1\r\n\r\nIt was a dark and stormy night. The rain fell in tor-\nrents.\r\n",
    )
    .unwrap();

    let paragraphs = load_paragraphs(&input).unwrap();
    let mut generator = AudiobookGenerator::new(ToneEngine::default(), AudiobookConfig::default());
    generator.generate(&paragraphs, &output, None).unwrap();

    assert!(output.exists());
    assert_eq!(
        generator.engine().spoken,
        vec![
            "Chapter one",
            "It was a dark and stormy night",
            "The rain fell in torrents"
        ]
    );
}

#[test]
fn output_is_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    let paragraphs = ["First, second, third.", "Fourth! Fifth?"];

    let mut bytes = Vec::new();
    for name in ["a.wav", "b.wav"] {
        let output = dir.path().join(name);
        AudiobookGenerator::new(ToneEngine::default(), AudiobookConfig::default())
            .generate(&paragraphs, &output, None)
            .unwrap();
        bytes.push(std::fs::read(&output).unwrap());
    }

    assert_eq!(bytes[0], bytes[1]);
}
