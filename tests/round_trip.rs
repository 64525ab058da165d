use slices_tokenizer::special_tokens::SPECIAL_TOKENS;
use slices_tokenizer::{SlicesTokenizer, TrainerConfig};
use tempfile::tempdir;

const ELEMENTS: [&str; 8] = ["H", "He", "C", "O", "Fe", "Ga", "Bi", "Cl"];
const BONDS: [&str; 6] = ["--o", "ooo", "+++", "-+o", "o-o", "+-+"];

/// Deterministically generates SLICES-shaped strings with single-space separation.
fn corpus(lines: usize) -> Vec<String> {
    (0..lines)
        .map(|line| {
            let mut parts = Vec::new();
            for idx in 0..(2 + line % 4) {
                parts.push(ELEMENTS[(line + idx * 3) % ELEMENTS.len()].to_string());
            }
            for edge in 0..(1 + line % 3) {
                parts.push(((line + edge) % 11).to_string());
                parts.push(((line * 2 + edge) % 13).to_string());
                parts.push(BONDS[(line + edge * 5) % BONDS.len()].to_string());
            }
            parts.join(" ")
        })
        .collect()
}

fn tokenizer() -> SlicesTokenizer {
    let config = TrainerConfig::builder()
        .show_progress(false)
        .build()
        .expect("config");
    SlicesTokenizer::with_config(config).expect("tokenizer")
}

#[test]
fn decode_inverts_encode_for_in_vocabulary_strings() {
    let lines = corpus(64);
    let mut tokenizer = tokenizer();
    tokenizer.train(&lines, 1000).expect("train");
    for line in &lines {
        let encoding = tokenizer.encode(line);
        assert_eq!(tokenizer.decode(&encoding.ids), *line);
    }
}

#[test]
fn special_tokens_are_fixed_for_any_corpus() {
    for lines in [0, 1, 17, 64] {
        let mut tokenizer = tokenizer();
        tokenizer.train(corpus(lines), 40).expect("train");
        for special in &SPECIAL_TOKENS {
            assert_eq!(tokenizer.id_to_token(special.id), special.content);
            assert_eq!(tokenizer.token_to_id(special.content), special.id);
        }
        assert!(tokenizer.vocab_size() <= 40);
    }
}

#[test]
fn capacity_is_filled_when_corpus_is_rich_enough() {
    let lines = corpus(64);
    for capacity in [6, 7, 15, 30] {
        let mut tokenizer = tokenizer();
        tokenizer.train(&lines, capacity).expect("train");
        assert_eq!(tokenizer.vocab_size(), capacity);
    }
}

#[test]
fn save_then_load_preserves_encodings() {
    let lines = corpus(32);
    let mut tokenizer = tokenizer();
    tokenizer.train(&lines, 25).expect("train");

    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("tokenizer.json");
    tokenizer.save(&path).expect("save");
    let loaded = SlicesTokenizer::from_file(&path).expect("load");

    assert_eq!(loaded.vocabulary(), tokenizer.vocabulary());
    for line in &lines {
        assert_eq!(loaded.encode(line), tokenizer.encode(line));
    }
}
