//! Fuzz target for the README analyzer.
//!
//! Validates:
//! - No panics on arbitrary UTF-8 documents
//! - Every score and confidence stays in [0, 1]
//! - Candidate and section positions stay inside the document

#![no_main]

use inkslot_content::analyze_content;
use libfuzzer_sys::fuzz_target;

const MAX_INPUT_SIZE: usize = 64 * 1024;

fn in_unit(v: f64) -> bool {
    (0.0..=1.0).contains(&v)
}

fuzz_target!(|data: &[u8]| {
    if data.len() > MAX_INPUT_SIZE {
        return;
    }
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(result) = analyze_content("fuzz", text) else {
        return;
    };

    assert!(in_unit(result.sentiment_score));
    assert!(in_unit(result.complexity_score));
    for s in result
        .technologies
        .languages
        .iter()
        .chain(&result.technologies.frameworks)
        .chain(&result.technologies.tools)
        .chain(&result.topics)
    {
        assert!(in_unit(s.confidence), "{} out of range", s.name);
    }
    for c in &result.placement_candidates {
        assert!(in_unit(c.score));
        assert!(c.position <= result.line_count);
    }
    for s in &result.sections {
        assert!(s.start_line <= s.end_line);
    }

    let again = analyze_content("fuzz", text).expect("second run");
    assert_eq!(result, again);
});
