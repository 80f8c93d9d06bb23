//! Regional care guidelines keyed by symptom label.

use std::path::Path;

use tracing::info;

use crate::error::DatasetError;

/// One symptom label and the advice given for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuidelineEntry {
    /// Lowercased, trimmed label.
    pub label: String,
    pub advisory: String,
}

/// Ordered, immutable label → advisory table.
///
/// Order is the insertion order of the source data; substring lookup picks the
/// first label that matches, so it matters.
#[derive(Debug, Clone, Default)]
pub struct GuidelineTable {
    entries: Vec<GuidelineEntry>,
}

impl GuidelineTable {
    /// Build a table from `(label, advisory)` pairs. Labels are compared
    /// case-insensitively and must be unique.
    pub fn from_pairs<I, L, A>(pairs: I) -> Result<Self, DatasetError>
    where
        I: IntoIterator<Item = (L, A)>,
        L: AsRef<str>,
        A: Into<String>,
    {
        let mut entries: Vec<GuidelineEntry> = Vec::new();
        for (index, (label, advisory)) in pairs.into_iter().enumerate() {
            let label = label.as_ref().trim().to_lowercase();
            if label.is_empty() {
                return Err(DatasetError::Malformed {
                    index,
                    reason: "empty guideline label".to_string(),
                });
            }
            if entries.iter().any(|e| e.label == label) {
                return Err(DatasetError::DuplicateLabel { label });
            }
            entries.push(GuidelineEntry {
                label,
                advisory: advisory.into(),
            });
        }
        Ok(Self { entries })
    }

    /// Parse a JSON object of `"label": "advisory"` pairs, keeping key order.
    pub fn from_json_str(json: &str) -> Result<Self, DatasetError> {
        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
        let mut pairs = Vec::with_capacity(map.len());
        for (index, (label, value)) in map.into_iter().enumerate() {
            let advisory = value.as_str().ok_or_else(|| DatasetError::Malformed {
                index,
                reason: format!("advisory for '{label}' is not a string"),
            })?;
            pairs.push((label, advisory.to_string()));
        }
        Self::from_pairs(pairs)
    }

    /// Load a table from a JSON file on disk.
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let raw = std::fs::read_to_string(path)?;
        let table = Self::from_json_str(&raw)?;
        info!(path = %path.display(), labels = table.len(), "Loaded guideline table");
        Ok(table)
    }

    /// The table shipped with the service (Finnish primary-care advice).
    pub fn builtin() -> Self {
        Self {
            entries: FINLAND_GUIDELINES
                .iter()
                .map(|(label, advisory)| GuidelineEntry {
                    label: (*label).to_string(),
                    advisory: (*advisory).to_string(),
                })
                .collect(),
        }
    }

    pub fn entries(&self) -> &[GuidelineEntry] {
        &self.entries
    }

    /// Labels in table order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any label occurs as a substring of already-lowercased `text`.
    pub fn mentions_any_label(&self, text: &str) -> bool {
        self.labels().any(|label| text.contains(label))
    }
}

const FINLAND_GUIDELINES: &[(&str, &str)] = &[
    ("cold", "In Finland, for common cold, stay warm, drink fluids, and rest. Over-the-counter pain relievers like ibuprofen or paracetamol can help. Seek medical help if symptoms last over 10 days or worsen."),
    ("fever", "Monitor your temperature regularly. If the fever exceeds 38°C for more than three days, consult your local health center (terveysasema). Maintain hydration and rest."),
    ("cough", "Cough usually resolves within a week. Avoid smoking and stay hydrated. If it lasts over 3 weeks or is accompanied by fever or shortness of breath, see a doctor."),
    ("sore throat", "Gargle with warm salt water and rest your voice. In Finland, if throat pain persists beyond 3 days with fever or swollen glands, book an appointment with a nurse or doctor."),
    ("flu", "Flu season in Finland runs from October to April. Rest, hydrate, and use fever medicine if needed. Contact healthcare if you have high fever, difficulty breathing, or are in a risk group."),
    ("fatigue", "Ensure you're getting enough sleep and eating balanced meals. If fatigue continues for more than two weeks, contact your local health center for evaluation."),
    ("headache", "Most headaches are tension-related. Try rest, fluids, and mild painkillers. Seek care if headaches are severe, sudden, or accompanied by vision problems or nausea."),
    ("body pain", "Mild body pain can be managed with light exercise, stretching, or pain relievers. Persistent or severe pain should be assessed by a healthcare provider."),
    ("nausea", "Stay hydrated and eat small, bland meals. If nausea persists for more than two days or includes vomiting, see a doctor to rule out infection or food poisoning."),
    ("vomiting", "Drink small sips of water frequently. In Finland, dehydration risk is taken seriously. Seek medical help if vomiting continues for over 24 hours or if there's blood in vomit."),
    ("dizziness", "Sit or lie down immediately to prevent falls. If dizziness is recurrent or associated with fainting, call your healthcare center."),
    ("sneezing", "Frequent sneezing may be due to allergies. Consider antihistamines. If symptoms persist, contact a pharmacy (apteekki) or doctor for advice."),
    ("chills", "Stay warm and hydrated. Persistent chills with fever may indicate infection, so visit your local health center."),
    ("throat pain", "Use warm fluids and throat lozenges. If accompanied by fever or swollen tonsils, book a test for strep at your health center."),
    ("weakness", "General weakness may indicate dehydration or infection. Rest and fluids are important. Contact healthcare if it lasts more than a few days."),
    ("runny nose", "Use saline spray and rest. If nasal discharge turns green/yellow and lasts beyond a week, consult a doctor."),
    ("shortness of breath", "If you experience difficulty breathing, contact emergency services (112) or visit a healthcare center immediately."),
    ("stomach pain", "Avoid heavy meals and drink water. If pain is severe, localized, or persistent, seek medical evaluation."),
    ("back pain", "Maintain gentle movement and good posture. Apply warmth. If pain radiates to legs or includes numbness, contact a doctor."),
    ("rash", "Avoid scratching and identify triggers. If rash spreads, blisters, or you have a fever, see a doctor."),
    ("ear pain", "Common in children with infections. Use pain relief and see a doctor if the pain lasts more than 1-2 days."),
    ("toothache", "Book an appointment with a dental clinic (hammashoitola). Painkillers can be used until the visit."),
    ("joint pain", "Use warm compresses and rest the affected area. Persistent swelling or redness requires medical check."),
    ("chest pain", "Chest pain should be taken seriously. If it's sudden, severe, or radiating to arm or jaw, call 112 immediately."),
    ("diarrhea", "Stay hydrated. Use oral rehydration solutions if needed. Seek medical attention if it persists more than 3 days."),
    ("constipation", "Increase fiber intake and fluids. Visit a pharmacy for mild laxatives if needed. Persistent constipation should be discussed with a doctor."),
    ("insomnia", "Maintain a sleep routine and limit screen use before bed. Contact a health center if sleeplessness continues for several weeks."),
    ("anxiety", "Practice relaxation and breathing techniques. If persistent, contact your local mental health services."),
    ("depression", "Reach out to your healthcare center or Mielenterveystalo.fi for mental health guidance and support."),
    ("allergy", "Avoid known allergens and consider antihistamines. For severe allergic reactions, use epinephrine and call 112."),
    ("asthma", "Use your inhaler as prescribed. If you experience worsening symptoms or difficulty breathing, contact emergency services."),
    ("migraine", "Rest in a dark room and stay hydrated. If migraines are frequent or disabling, seek medical evaluation."),
    ("urinary infection", "Increase fluid intake. Contact your health center for urine tests if you experience pain during urination or fever."),
    ("skin irritation", "Use fragrance-free moisturizers. Seek medical help if rash worsens or causes pain."),
];
