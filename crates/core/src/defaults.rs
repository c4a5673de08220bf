//! Built-in configuration: the seed challenge list and the achievement catalog.

use crate::model::{
    Achievement, AchievementCatalog, AchievementId, Points, Question, QuestionDraft, QuestionId,
};

/// Version string written into data exports.
pub const DATA_VERSION: &str = "3.0";

struct Seed {
    id: &'static str,
    prompt: &'static str,
    answer: &'static str,
    description: &'static str,
    hints: [&'static str; 2],
    points: i64,
}

const SEED: [Seed; 4] = [
    Seed {
        id: "q1",
        prompt: "Scan QR code yang berisi kata 'START'",
        answer: "START",
        description: "Langkah pertama: Temukan dan scan QR code yang berisi kata START untuk memulai pembelajaran",
        hints: ["Pastikan QR code terlihat jelas", "Kata harus dalam huruf kapital"],
        points: 10,
    },
    Seed {
        id: "q2",
        prompt: "Scan QR code yang berisi angka '123'",
        answer: "123",
        description: "Langkah kedua: Temukan dan scan QR code yang berisi angka 123 untuk melanjutkan",
        hints: ["Angka harus berurutan", "Tidak ada spasi atau karakter lain"],
        points: 15,
    },
    Seed {
        id: "q3",
        prompt: "Scan QR code yang berisi kata 'MIDDLE'",
        answer: "MIDDLE",
        description: "Langkah ketiga: Scan QR code yang berisi kata MIDDLE",
        hints: ["Kata tengah dari proses pembelajaran", "Dalam huruf kapital"],
        points: 20,
    },
    Seed {
        id: "q4",
        prompt: "Scan QR code yang berisi kata 'FINISH'",
        answer: "FINISH",
        description: "Langkah terakhir: Temukan dan scan QR code yang berisi kata FINISH untuk menyelesaikan pembelajaran",
        hints: ["Kata penutup pembelajaran", "Pastikan semua huruf kapital"],
        points: 25,
    },
];

/// The default challenge sequence, numbered 1..N.
#[must_use]
pub fn default_questions() -> Vec<Question> {
    SEED.iter()
        .enumerate()
        .filter_map(|(index, seed)| {
            QuestionDraft::new(seed.prompt, seed.answer)
                .with_description(seed.description)
                .with_hints(seed.hints)
                .with_points(Points::clamped(seed.points))
                .validate()
                .ok()
                .map(|content| {
                    content.assign(
                        QuestionId::new(seed.id),
                        u32::try_from(index + 1).unwrap_or(u32::MAX),
                    )
                })
        })
        .collect()
}

/// The default achievement catalog.
#[must_use]
pub fn default_catalog() -> AchievementCatalog {
    AchievementCatalog::new(vec![
        Achievement::new(
            AchievementId::FirstScan,
            "Pemindai Pertama",
            "Berhasil melakukan scan QR pertama",
            "🎯",
            5,
        ),
        Achievement::new(
            AchievementId::PerfectRun,
            "Sempurna!",
            "Menyelesaikan semua langkah tanpa kesalahan",
            "⭐",
            50,
        ),
        Achievement::new(
            AchievementId::SpeedDemon,
            "Kilat",
            "Menyelesaikan dalam waktu kurang dari 2 menit",
            "⚡",
            30,
        ),
        Achievement::new(
            AchievementId::Photographer,
            "Fotografer",
            "Menangkap 5+ gambar selama pembelajaran",
            "📸",
            20,
        ),
    ])
}
