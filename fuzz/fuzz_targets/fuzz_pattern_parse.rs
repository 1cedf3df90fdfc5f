#![no_main]

use hydra::{Hydra, Lemma, Pattern};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(pattern) = Pattern::parse(text) {
        let serialized = pattern.to_string();
        // Case folding can expand a letter into a combining sequence, which
        // does not parse back; everything else must round-trip.
        if let Ok(reparsed) = Pattern::parse(&serialized) {
            assert_eq!(reparsed, pattern);
        } else {
            assert!(pattern.word().iter().any(|c| !c.is_alphabetic()));
        }

        let mut hydra = Hydra::new();
        hydra.insert_pattern(&pattern).expect("parsed pattern inserts");
        assert_eq!(hydra.digest(), vec![serialized]);
    }

    if let Ok(Some(mut lemma)) = Lemma::parse(text) {
        let _ = lemma.annotate();
        let _ = lemma.seek(lemma.len());
        assert!(lemma.seek(lemma.len() + 1).is_err());
    }
});
