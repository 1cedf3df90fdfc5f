#![no_main]

use arbitrary::Arbitrary;
use hydra::{Hydra, HyphenMins};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum Op {
    Insert { word: Vec<u8>, digits: Vec<u8>, initial: bool, terminal: bool },
    Delete(Vec<u8>),
    Search(Vec<u8>),
    Prehyphenate(Vec<u8>),
    Margins { left: u8, right: u8 },
}

/// Map bytes onto a small alphabet so operations collide often.
fn letters(bytes: &[u8]) -> String {
    bytes
        .iter()
        .take(12)
        .map(|b| char::from(b'a' + b % 6))
        .collect()
}

fn render(word: &str, digits: &[u8], initial: bool, terminal: bool) -> String {
    let mut out = String::new();
    if initial {
        out.push('.');
    }
    for (i, letter) in word.chars().enumerate() {
        if let Some(&d) = digits.get(i)
            && d % 10 > 0
        {
            out.push(char::from(b'0' + d % 10));
        }
        out.push(letter);
    }
    if let Some(&d) = digits.get(word.len())
        && d % 10 > 0
    {
        out.push(char::from(b'0' + d % 10));
    }
    if terminal {
        out.push('.');
    }
    out
}

fuzz_target!(|ops: Vec<Op>| {
    let mut hydra = Hydra::new();
    for op in ops.into_iter().take(256) {
        match op {
            Op::Insert { word, digits, initial, terminal } => {
                let word = letters(&word);
                if word.is_empty() {
                    continue;
                }
                hydra
                    .insert_word(&render(&word, &digits, initial, terminal))
                    .expect("well-formed pattern inserts");
            }
            Op::Delete(word) => {
                let word = letters(&word);
                if !word.is_empty() {
                    let _ = hydra.delete(&word);
                }
            }
            Op::Search(word) => {
                let word = letters(&word);
                if !word.is_empty() {
                    let _ = hydra.search(&word);
                }
            }
            Op::Prehyphenate(word) => {
                let word = letters(&word);
                let result = hydra.prehyphenate(&word).expect("prehyphenate");
                assert_eq!(result.digits().len(), word.len() + 1);
            }
            Op::Margins { left, right } => {
                hydra.set_margins(HyphenMins::new(usize::from(left % 5), usize::from(right % 5)));
            }
        }
    }

    // Every digested pattern reloads into an identical trie.
    let digest = hydra.digest();
    let reloaded = Hydra::from_words(&digest).expect("digest reloads");
    assert_eq!(reloaded.digest(), digest);
    assert_eq!(hydra.count(), digest.len());
});
