//! Static ICD-10 reference data: common diagnostic codes grouped by system,
//! plus the keyword map backing code suggestion.

/// (code, description) pairs. Loaded once, never mutated.
pub(super) const ICD_CODES: &[(&str, &str)] = &[
    // Common symptoms
    ("R51", "Headache"),
    ("R50.9", "Fever, unspecified"),
    ("R05", "Cough"),
    ("R06.02", "Shortness of breath"),
    ("R53.83", "Fatigue"),
    ("R11.0", "Nausea"),
    ("R11.2", "Nausea with vomiting"),
    ("R10.9", "Abdominal pain, unspecified"),
    ("R07.9", "Chest pain, unspecified"),
    ("R42", "Dizziness and giddiness"),
    ("R68.83", "Chills"),
    // Cardiovascular
    ("I10", "Essential (primary) hypertension"),
    ("I11.0", "Hypertensive heart disease with heart failure"),
    ("I25.10", "Atherosclerotic heart disease"),
    ("I48.91", "Atrial fibrillation"),
    ("I50.9", "Heart failure, unspecified"),
    ("I21.9", "Acute myocardial infarction"),
    ("I63.9", "Cerebral infarction, unspecified"),
    // Respiratory
    ("J06.9", "Upper respiratory infection"),
    ("J02.9", "Acute pharyngitis"),
    ("J20.9", "Acute bronchitis"),
    ("J18.9", "Pneumonia, unspecified"),
    ("J45.909", "Asthma, unspecified"),
    ("J44.0", "COPD with acute lower respiratory infection"),
    ("J44.1", "COPD with acute exacerbation"),
    // Endocrine / metabolic
    ("E11.9", "Type 2 diabetes mellitus without complications"),
    ("E11.65", "Type 2 diabetes with hyperglycemia"),
    ("E78.5", "Hyperlipidemia"),
    ("E66.9", "Obesity, unspecified"),
    ("E03.9", "Hypothyroidism, unspecified"),
    ("E05.90", "Hyperthyroidism, unspecified"),
    // Gastrointestinal
    ("K21.9", "Gastro-esophageal reflux disease"),
    ("K29.70", "Gastritis, unspecified"),
    ("K58.9", "Irritable bowel syndrome"),
    ("K59.00", "Constipation, unspecified"),
    ("K52.9", "Gastroenteritis and colitis"),
    // Musculoskeletal
    ("M25.50", "Pain in joint, unspecified"),
    ("M54.5", "Low back pain"),
    ("M79.1", "Myalgia"),
    ("M25.561", "Pain in right knee"),
    ("M25.562", "Pain in left knee"),
    // Mental health
    ("F41.1", "Generalized anxiety disorder"),
    ("F32.9", "Major depressive disorder, single episode"),
    ("F33.1", "Major depressive disorder, recurrent"),
    ("F41.9", "Anxiety disorder, unspecified"),
    ("F43.10", "Post-traumatic stress disorder"),
    // Neurological
    ("G43.909", "Migraine, unspecified"),
    ("G89.29", "Chronic pain"),
    ("G47.00", "Insomnia, unspecified"),
    // Infectious
    ("B34.9", "Viral infection, unspecified"),
    ("A09", "Infectious gastroenteritis"),
    ("J03.90", "Acute tonsillitis, unspecified"),
    // Dermatological
    ("L30.9", "Dermatitis, unspecified"),
    ("L50.9", "Urticaria, unspecified"),
    ("L70.0", "Acne vulgaris"),
    // Urinary
    ("N39.0", "Urinary tract infection"),
    ("N18.3", "Chronic kidney disease, stage 3"),
    ("N40.0", "Benign prostatic hyperplasia"),
    // General
    ("Z00.00", "General adult medical examination"),
    ("Z23", "Immunization"),
    ("Z79.4", "Long-term use of insulin"),
    ("Z79.899", "Long-term use of other medications"),
];

/// keyword → candidate codes, scanned in order over clinical text.
/// Multi-word keywords appear before their single-word substrings so the
/// more specific code is emitted first.
pub(super) const KEYWORD_CODES: &[(&str, &[&str])] = &[
    ("headache", &["R51", "G43.909"]),
    ("fever", &["R50.9"]),
    ("cough", &["R05", "J20.9"]),
    ("diabetes", &["E11.9", "E11.65"]),
    ("hypertension", &["I10"]),
    ("chest pain", &["R07.9"]),
    ("back pain", &["M54.5"]),
    ("pain", &["M79.1", "G89.29"]),
    ("anxiety", &["F41.1", "F41.9"]),
    ("depression", &["F32.9", "F33.1"]),
    ("asthma", &["J45.909"]),
    ("pneumonia", &["J18.9"]),
    ("vomiting", &["R11.2"]),
    ("nausea", &["R11.0"]),
    ("dizziness", &["R42"]),
    ("fatigue", &["R53.83"]),
    ("obesity", &["E66.9"]),
    ("infection", &["B34.9"]),
    ("uti", &["N39.0"]),
    ("gastritis", &["K29.70"]),
];
