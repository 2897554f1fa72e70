use std::path::{Path, PathBuf};

const NEUTRAL: [&str; 6] = [
    "@user enjoying sunshine with family #happy",
    "lovely morning walking outside #blessed",
    "family dinner tonight was wonderful #love",
    "sunshine makes everything lovely #happy",
    "celebrating birthday with friends #love",
    "thankful for wonderful friends #blessed",
];

const OFFENSIVE: [&str; 6] = [
    "@user horrible racist comments again #trump",
    "racist hateful people everywhere #politics",
    "hateful horrible attitude from them",
    "stop racist behaviour now #politics",
    "disgusting bigot spreading hatred #trump",
    "horrible bigot comments online",
];

/// Deterministic labeled tweets; even rows neutral, odd rows offensive.
pub fn synthetic_tweets(rows: usize) -> Vec<(u8, String)> {
    (0..rows)
        .map(|i| {
            let variant = (i / 2) % NEUTRAL.len();
            if i % 2 == 0 {
                (0, NEUTRAL[variant].to_string())
            } else {
                (1, OFFENSIVE[variant].to_string())
            }
        })
        .collect()
}

/// Write `rows` as an `id,label,tweet` CSV file in `dir`.
pub fn write_corpus_csv(dir: &Path, rows: &[(u8, String)]) -> PathBuf {
    let path = dir.join("tweets.csv");
    let mut writer = csv::Writer::from_path(&path).expect("create corpus csv");
    writer
        .write_record(["id", "label", "tweet"])
        .expect("write header");
    for (idx, (label, text)) in rows.iter().enumerate() {
        writer
            .write_record([(idx + 1).to_string(), label.to_string(), text.clone()])
            .expect("write row");
    }
    writer.flush().expect("flush corpus csv");
    path
}
