use serde::{Deserialize, Serialize};

/// Literal field keys of the source dataset (one JSON object per participant).
pub const FIELD_NO: &str = "No";
pub const FIELD_NAME: &str = "Nama Lengkap Siswa/i";
pub const FIELD_SCHOOL: &str = "Sekolah Asal Siswa/i";
pub const FIELD_LEVEL: &str = "Level";
pub const FIELD_BIDANG: &str = "Bidang Kompetisi";
pub const FIELD_LANGUAGE: &str = "Pilihan Bahasa untuk soal";
pub const FIELD_RUANG: &str = "Ruang";

pub const SUBJECT_MATEMATIKA: &str = "Matematika";
pub const SUBJECT_SAINS: &str = "Sains";
/// Marker prefix of records registered for both subjects
/// ("Mengikuti keduanya Matematika dan Sains").
pub const BOTH_SUBJECTS_PREFIX: &str = "Mengikuti keduanya";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub data_file: String,
    pub output_directory: Option<String>,
    /// Whole-word acronyms restored to uppercase after title-casing.
    /// Kept configurable because the list is tied to one dataset's
    /// school-naming conventions.
    pub acronyms: Vec<String>,
    pub csv_filename: Option<String>,
    pub pdf_filename: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: "label_data_clean.json".to_string(),
            output_directory: Some("output".to_string()),
            acronyms: vec![
                "SD".to_string(),
                "SDS".to_string(),
                "SDI".to_string(),
                "SDIT".to_string(),
                "SMP".to_string(),
                "SMPS".to_string(),
                "SMPN".to_string(),
                "MTSN".to_string(),
                "UPI".to_string(),
                "QLP".to_string(),
                "UIN".to_string(),
            ],
            csv_filename: Some("peserta_terfilter.csv".to_string()),
            pdf_filename: Some("peserta_terfilter.pdf".to_string()),
        }
    }
}

impl Config {
    pub fn load_from_file(file_path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(file_path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, file_path: &str) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(file_path, content)?;
        Ok(())
    }
}

/// One roster row. `ruang` starts empty and is only filled by room assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub no: i64,
    pub name: String,
    pub school: String,
    pub level: String,
    pub bidang: String,
    pub language: String,
    #[serde(default)]
    pub ruang: String,
}

impl Participant {
    pub fn is_both_subjects(&self) -> bool {
        self.bidang.trim().starts_with(BOTH_SUBJECTS_PREFIX)
    }

    /// Lowercased haystack for the free-text search predicate.
    pub fn search_text(&self) -> String {
        [
            self.name.as_str(),
            self.school.as_str(),
            self.level.as_str(),
            self.bidang.as_str(),
        ]
        .map(str::to_lowercase)
        .join(" ")
    }
}

/// Summary counts computed over the normalized, unfiltered dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryCounts {
    pub total: usize,
    pub matematika: usize,
    pub sains: usize,
    pub keduanya: usize,
}

impl SummaryCounts {
    pub fn of(participants: &[Participant]) -> Self {
        Self {
            total: participants.len(),
            matematika: participants
                .iter()
                .filter(|p| p.bidang.trim() == SUBJECT_MATEMATIKA)
                .count(),
            sains: participants
                .iter()
                .filter(|p| p.bidang.trim() == SUBJECT_SAINS)
                .count(),
            keduanya: participants.iter().filter(|p| p.is_both_subjects()).count(),
        }
    }
}
