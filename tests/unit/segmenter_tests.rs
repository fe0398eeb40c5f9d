/*!
 * Tests for the cue segmentation fold
 */

use subcue::errors::SegmentError;
use subcue::segmenter::{normalize_text, segment, CueSegmenter, SegmentationParams};
use subcue::transcript::Transcript;
use crate::common::{plain_words, word};

fn defaults() -> SegmentationParams {
    SegmentationParams::default()
}

#[test]
fn test_segment_withEmptyInput_shouldReturnNoCues() {
    let cues = segment(&[], &defaults()).unwrap();
    assert!(cues.is_empty());
}

#[test]
fn test_segment_withSingleWord_shouldSpanThatWord() {
    let cues = segment(&[word("hello", 0.3, 0.8)], &defaults()).unwrap();

    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].seq_num, 1);
    assert_eq!(cues[0].start_secs, 0.3);
    assert_eq!(cues[0].end_secs, 0.8);
    assert_eq!(cues[0].text, "hello");
}

#[test]
fn test_segment_withExactlyMaxWords_shouldEmitOneJoinedCue() {
    let words = vec![word("one", 0.0, 0.2), word("two", 0.2, 0.4), word("three", 0.4, 0.6)];
    let cues = segment(&words, &SegmentationParams::new(3, 1.0)).unwrap();

    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].text, "one two three");
    assert_eq!(cues[0].start_secs, 0.0);
    assert_eq!(cues[0].end_secs, 0.6);
}

#[test]
fn test_segment_withMoreThanMaxWords_shouldSplitByCount() {
    let cues = segment(&plain_words(7), &SegmentationParams::new(3, 1.0)).unwrap();

    let texts: Vec<&str> = cues.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["w0 w1 w2", "w3 w4 w5", "w6"]);
}

#[test]
fn test_segment_withSentenceEnd_shouldFlushBeforeMaxWords() {
    let words = vec![
        word("Stop.", 0.0, 0.3),
        word("Really?", 0.35, 0.7),
        word("Yes", 0.75, 0.9),
        word("indeed!", 0.9, 1.2),
        word("ok", 1.25, 1.4),
    ];
    let cues = segment(&words, &SegmentationParams::new(5, 1.0)).unwrap();

    let texts: Vec<&str> = cues.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["Stop.", "Really?", "Yes indeed!", "ok"]);
    assert_eq!(cues[2].start_secs, 0.75);
    assert_eq!(cues[2].end_secs, 1.2);
}

#[test]
fn test_segment_withLongPause_shouldFlushAtPreviousWordEnd() {
    let words = vec![word("A", 0.0, 0.5), word("B", 2.0, 2.5)];
    let cues = segment(&words, &SegmentationParams::new(3, 1.0)).unwrap();

    assert_eq!(cues.len(), 2);
    assert_eq!((cues[0].start_secs, cues[0].end_secs), (0.0, 0.5));
    assert_eq!(cues[0].text, "A");
    assert_eq!((cues[1].start_secs, cues[1].end_secs), (2.0, 2.5));
    assert_eq!(cues[1].text, "B");
}

#[test]
fn test_segment_withPauseEqualToThreshold_shouldNotSplit() {
    let words = vec![word("A", 0.0, 0.5), word("B", 1.5, 2.0)];
    let cues = segment(&words, &SegmentationParams::new(3, 1.0)).unwrap();

    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].text, "A B");
}

#[test]
fn test_segment_withZeroThreshold_shouldSplitOnAnyGap() {
    let words = vec![word("a", 0.0, 0.5), word("b", 0.5, 1.0), word("c", 1.1, 1.5)];
    let cues = segment(&words, &SegmentationParams::new(10, 0.0)).unwrap();

    let texts: Vec<&str> = cues.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["a b", "c"]);
}

#[test]
fn test_segment_withSegmentedTranscript_shouldIgnoreSegmentBoundaries() {
    let transcript = Transcript::from_json_str(
        r#"{"segments":[
            {"words":[{"word":" one","start":0.0,"end":0.2}]},
            {"words":[{"word":" two","start":0.2,"end":0.4},{"word":" three","start":0.4,"end":0.6}]}
        ]}"#,
    )
    .unwrap();

    let segmenter = CueSegmenter::new(defaults()).unwrap();
    let cues = segmenter.segment_transcript(&transcript);

    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].text, "one two three");
}

#[test]
fn test_segment_withAnyInput_shouldNumberCuesSequentially() {
    let mut words = plain_words(20);
    words[4].text.push('.');
    words[11].start += 3.0;
    words[11].end += 3.0;

    let cues = segment(&words, &SegmentationParams::new(4, 1.0)).unwrap();

    for (i, cue) in cues.iter().enumerate() {
        assert_eq!(cue.seq_num, i + 1);
    }
}

#[test]
fn test_segment_withOrderedInput_shouldNotOverlap() {
    let mut words = plain_words(30);
    words[7].text.push('?');
    for w in words.iter_mut().skip(15) {
        w.start += 5.0;
        w.end += 5.0;
    }

    for max_words in 1..6 {
        let cues = segment(&words, &SegmentationParams::new(max_words, 1.0)).unwrap();
        for pair in cues.windows(2) {
            assert!(pair[0].end_secs <= pair[1].start_secs, "{:?} overlaps {:?}", pair[0], pair[1]);
        }
        for cue in &cues {
            assert!(cue.start_secs <= cue.end_secs);
        }
    }
}

#[test]
fn test_segment_withOutOfOrderInput_shouldStayMechanical() {
    let words = vec![word("late", 5.0, 5.5), word("early", 1.0, 1.5)];
    let cues = segment(&words, &SegmentationParams::new(2, 1.0)).unwrap();

    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].start_secs, 5.0);
    assert_eq!(cues[0].end_secs, 1.5);
    assert!(cues[0].duration_secs() < 0.0);
}

#[test]
fn test_segment_withMessyWhitespace_shouldNormalizeText() {
    let words = vec![word(" Hello", 0.0, 0.2), word("  big\t", 0.2, 0.4), word("\nworld ", 0.4, 0.6)];
    let cues = segment(&words, &defaults()).unwrap();
    assert_eq!(cues[0].text, "Hello big world");
}

// Empty-text cues: kept by default, dropped on request without using an index.
#[test]
fn test_segment_withBlankWordAndDefaultParams_shouldKeepEmptyCue() {
    let words = vec![word("  ", 0.0, 0.1), word("next", 3.0, 3.2)];
    let cues = segment(&words, &defaults()).unwrap();

    assert_eq!(cues.len(), 2);
    assert_eq!(cues[0].text, "");
    assert_eq!(cues[1].seq_num, 2);
}

#[test]
fn test_segment_withBlankWordAndDropEmpty_shouldSkipWithoutGap() {
    let words = vec![word("  ", 0.0, 0.1), word("next", 3.0, 3.2)];
    let params = SegmentationParams {
        keep_empty_cues: false,
        ..defaults()
    };
    let cues = segment(&words, &params).unwrap();

    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].seq_num, 1);
    assert_eq!(cues[0].text, "next");
}

#[test]
fn test_segment_withZeroMaxWords_shouldRejectParameter() {
    let err = segment(&plain_words(2), &SegmentationParams::new(0, 1.0)).unwrap_err();
    assert!(matches!(err, SegmentError::InvalidParameter { name: "max_words_per_cue", .. }));
}

#[test]
fn test_segment_withNegativeThreshold_shouldRejectParameter() {
    let err = CueSegmenter::new(SegmentationParams::new(3, -0.5)).unwrap_err();
    assert!(matches!(err, SegmentError::InvalidParameter { name: "pause_threshold", .. }));

    let err = CueSegmenter::new(SegmentationParams::new(3, f64::NAN)).unwrap_err();
    assert!(matches!(err, SegmentError::InvalidParameter { name: "pause_threshold", .. }));
}

#[test]
fn test_normalize_text_appliedTwice_shouldBeIdempotent() {
    for input in ["  a  b  ", "\tx\n\ny z", "", "already clean", " . "] {
        let once = normalize_text(input);
        assert_eq!(normalize_text(&once), once);
    }
}
