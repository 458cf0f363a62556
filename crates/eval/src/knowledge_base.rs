//! The built-in diagnosis rules.
//!
//! Declaration order is significant: it is the tie-break order for rules of
//! equal salience, and ids must ascend with it.
//!
//! Salience tiers: symptom overrides of a Healthy label (10, 9), the
//! anthracnose/mosaic conflict (8), direct rules (0), fallback (-1).

use tuberdx_core::{
    ClassifierLabel, Field, LeafTexture, Observed, StemLesion, StemSticky, TuberFirmness,
    TuberSmell, TuberTexture,
};

use crate::types::{ActionGuard, Bindings, Condition, RecordTemplate, Rule, RuleCategory};

macro_rules! label {
    ($l:ident) => {
        Condition::Is(Observed::Label(ClassifierLabel::$l))
    };
}

macro_rules! leaf {
    ($v:ident) => {
        Condition::Is(Observed::LeafTexture(LeafTexture::$v))
    };
}

macro_rules! lesion {
    ($v:ident) => {
        Condition::Is(Observed::StemLesion(StemLesion::$v))
    };
}

macro_rules! sticky {
    ($v:ident) => {
        Condition::Is(Observed::StemSticky(StemSticky::$v))
    };
}

macro_rules! texture {
    ($v:ident) => {
        Condition::Is(Observed::TuberTexture(TuberTexture::$v))
    };
}

macro_rules! firmness {
    ($v:ident) => {
        Condition::Is(Observed::TuberFirmness(TuberFirmness::$v))
    };
}

macro_rules! smell {
    ($v:ident) => {
        Condition::Is(Observed::TuberSmell(TuberSmell::$v))
    };
}

macro_rules! capture {
    ($field:ident as $var:literal) => {
        Condition::Capture {
            field: Field::$field,
            var: $var,
        }
    };
}

const fn direct(
    id: u32,
    name: &'static str,
    conditions: &'static [Condition],
    title: &'static str,
    body: &'static str,
) -> Rule {
    Rule {
        id,
        name,
        category: RuleCategory::Direct,
        salience: 0,
        conditions,
        guard: None,
        fires_when: ActionGuard::Always,
        action: RecordTemplate { title, body },
    }
}

fn ya_mod_guard(b: &Bindings) -> bool {
    b.is("lt", Observed::LeafTexture(LeafTexture::DryBrittle))
        || b.is("tf", Observed::TuberFirmness(TuberFirmness::SoftMushy))
}

fn cbb_mod_guard(b: &Bindings) -> bool {
    b.is("lt", Observed::LeafTexture(LeafTexture::SoftMushy))
        || b.is("tf", Observed::TuberFirmness(TuberFirmness::SoftMushy))
}

pub const RULES: &[Rule] = &[
    // Yam anthracnose
    direct(
        1,
        "ya_high",
        &[
            label!(YamAnthracnose),
            leaf!(DryBrittle),
            lesion!(Wet),
            firmness!(SoftMushy),
            smell!(Foul),
        ],
        "HIGH LIKELIHOOD: Yam Anthracnose",
        "This is a severe infection. Immediate action is required:\n\
- **Sanitation:** Carefully prune and collect all infected leaves, stems, and tubers. Do not compost them. The best method of disposal is burning. If not possible, bury them at least 2 feet deep.\n\
- **Fungicide Application:** Apply a protective fungicide like Mancozeb or a copper-based product. Ensure full coverage of all plant surfaces. Follow the manufacturer's instructions for dosage and frequency.\n\
- **Crop Rotation:** Do not plant yams in this field for at least 2-3 years. Rotate with non-host crops like maize, legumes, or sorghum.",
    ),
    Rule {
        guard: Some(ya_mod_guard),
        ..direct(
            2,
            "ya_mod",
            &[
                label!(YamAnthracnose),
                lesion!(Wet),
                capture!(LeafTexture as "lt"),
                capture!(TuberFirmness as "tf"),
            ],
            "MODERATE LIKELIHOOD: Yam Anthracnose",
            "The disease is present and needs to be managed:\n\
- **Immediate Action:** Remove and destroy all visibly affected plant parts to reduce the spread of spores.\n\
- **Fungicide:** Consider applying a recommended fungicide, especially if weather conditions are wet and humid, which favors the disease.\n\
- **Monitoring:** Inspect your plants twice a week. Look for new lesions on leaves and stems. If symptoms spread, escalate to the high-likelihood control measures.",
        )
    },
    direct(
        3,
        "ya_low",
        &[
            label!(YamAnthracnose),
            leaf!(DryBrittle),
            lesion!(No),
            firmness!(NormalFirm),
        ],
        "LOW LIKELIHOOD: Yam Anthracnose",
        "Symptoms are minor but should not be ignored:\n\
- **Isolate & Observe:** Remove the few affected leaves.\n\
- **Improve Airflow:** Ensure there is good spacing between plants to reduce humidity. Prune any unnecessary foliage.\n\
- **Withhold Fungicide:** Hold off on chemical sprays for now, but be prepared to act if the disease spreads. This could also be sun scorch; ensure consistent watering.",
    ),
    // Yam mosaic virus
    direct(
        4,
        "ymv_high",
        &[
            label!(YamMosaicVirus),
            leaf!(NormalSoftPuckered),
            firmness!(NormalFirm),
        ],
        "HIGH LIKELIHOOD: Yam Mosaic Virus",
        "This viral disease is spread by aphids and infected materials. There is no cure, so prevention of spread is key:\n\
- **Roguing:** Immediately and carefully uproot the entire infected plant. Place it in a bag on the spot to avoid shaking aphids off, and remove it from the field. Burn or bury it deeply.\n\
- **Vector Control:** Control the aphid population. Options include spraying with insecticidal soap or neem oil, or encouraging natural predators like ladybugs.\n\
- **Clean Planting Material:** For your next crop, source certified virus-free yam setts from a reputable agricultural institution.",
    ),
    direct(
        5,
        "ymv_mod_rot",
        &[
            label!(YamMosaicVirus),
            leaf!(NormalSoftPuckered),
            firmness!(SoftMushy),
        ],
        "MODERATE LIKELIHOOD: Yam Mosaic Virus with secondary tuber rot",
        "The primary issue is the virus, which may have weakened the plant and allowed for a secondary rot infection:\n\
- **Primary Control:** Uproot and destroy the infected plant to prevent the virus from spreading.\n\
- **Storage Management:** The tuber rot suggests issues with soil moisture or storage. Improve soil drainage. When harvesting, cure tubers in a dry, airy location for several days before long-term storage.",
    ),
    // Cassava bacterial blight
    direct(
        6,
        "cbb_high",
        &[
            label!(CassavaBacterialBlight),
            leaf!(SoftMushy),
            sticky!(Yes),
            firmness!(SoftMushy),
            smell!(Foul),
        ],
        "HIGH LIKELIHOOD: Cassava Bacterial Blight",
        "This is a very serious and contagious bacterial disease. Strict quarantine and sanitation are critical:\n\
- **Total Destruction:** Uproot and burn all infected plants immediately. Do not leave any debris in the field.\n\
- **Tool Sterilization:** Thoroughly disinfect all tools (machetes, hoes, etc.) used in the affected area with a 10% bleach solution (1 part bleach to 9 parts water).\n\
- **Field Quarantine:** Do not plant cassava in this field for at least two full growing seasons.\n\
- **Resistant Varieties:** In the future, plant varieties known to be resistant to CBB.",
    ),
    Rule {
        guard: Some(cbb_mod_guard),
        ..direct(
            7,
            "cbb_mod",
            &[
                label!(CassavaBacterialBlight),
                sticky!(Yes),
                capture!(LeafTexture as "lt"),
                capture!(TuberFirmness as "tf"),
            ],
            "MODERATE LIKELIHOOD: Cassava Bacterial Blight",
            "The presence of sticky ooze is a major red flag. Act now to prevent a full-blown outbreak:\n\
- **Sanitation:** Begin by removing and burning any plants showing symptoms.\n\
- **Tool Discipline:** Start a strict tool disinfection routine for all farm activities. Do not move from affected areas to healthy areas without cleaning tools first.\n\
- **Monitoring:** Check your field daily for new symptoms like angular leaf spots, wilting, or dieback.",
        )
    },
    direct(
        8,
        "cbb_low",
        &[
            label!(CassavaBacterialBlight),
            leaf!(SoftMushy),
            sticky!(No),
        ],
        "LOW LIKELIHOOD: Cassava Bacterial Blight",
        "The key symptom (sticky stem) is absent, but caution is needed:\n\
- **Water Management:** Soft leaves can be caused by waterlogged soil. Check soil moisture and ensure proper drainage.\n\
- **Vigilant Monitoring:** Watch the plants closely for a week. If you see any gummy liquid on stems or angular, water-soaked spots on leaves, escalate to moderate-level controls immediately.",
    ),
    // Cassava mosaic virus
    direct(
        9,
        "cmv_high",
        &[
            label!(CassavaMosaicVirus),
            leaf!(NormalSoftPuckered),
            firmness!(NormalFirm),
        ],
        "HIGH LIKELIHOOD: Cassava Mosaic Virus",
        "Similar to YMV, this is a viral disease with no cure. Control is focused on stopping the vector (whitefly) and using clean material:\n\
- **Roguing:** Uproot and destroy any plant showing the characteristic mosaic and distorted leaves.\n\
- **Vector Control:** Manage whitefly populations. Use yellow sticky traps to monitor and catch them. Applications of neem oil can deter feeding.\n\
- **Clean Cuttings:** Only plant cuttings taken from healthy, symptom-free mother plants. If possible, use certified virus-free cuttings.",
    ),
    direct(
        10,
        "cmv_mod_rot",
        &[
            label!(CassavaMosaicVirus),
            leaf!(NormalSoftPuckered),
            firmness!(SoftMushy),
        ],
        "MODERATE LIKELIHOOD: Cassava Mosaic Virus with tuber rot",
        "The virus has likely weakened the plant, making it susceptible to other soil-borne pathogens:\n\
- **Address the Virus First:** Remove and destroy the mosaic-infected plants to stop the virus from spreading via whiteflies.\n\
- **Investigate Rot:** Check for causes of rot. Is the soil poorly drained? Were tubers damaged during weeding? Address these underlying issues to protect healthy plants.",
    ),
    // Symptom overrides and conflicts
    Rule {
        category: RuleCategory::Override,
        salience: 10,
        ..direct(
            11,
            "override_cbb_critical",
            &[label!(Healthy), sticky!(Yes)],
            "CRITICAL: Cassava Bacterial Blight (Symptom Override)",
            "The CNN result has been overridden. A sticky stem is a definitive sign of Bacterial Blight.\n\
- **Urgent Action:** Do not trust the 'Healthy' scan. Treat this as a high-likelihood CBB infection. Immediately uproot and burn the plant. Sterilize any tool that touched it. This symptom is too critical to ignore.",
        )
    },
    Rule {
        category: RuleCategory::Override,
        salience: 9,
        ..direct(
            12,
            "override_mosaic",
            &[
                label!(Healthy),
                leaf!(NormalSoftPuckered),
            ],
            "POSSIBLE: Mosaic Virus (Symptom Override)",
            "The leaf puckering is a classic symptom of a mosaic virus that should not be ignored, even if the CNN scan indicated 'Healthy'.\n\
- **Precautionary Measures:** It is safest to assume the plant is infected. Uproot and destroy it to prevent spread by insect vectors (aphids for yam, whiteflies for cassava).",
        )
    },
    Rule {
        category: RuleCategory::Conflict,
        salience: 8,
        ..direct(
            13,
            "conflict_ya_ymv",
            &[
                label!(YamAnthracnose),
                leaf!(NormalSoftPuckered),
            ],
            "INCONCLUSIVE: Conflicting Information",
            "The system cannot make a reliable diagnosis.\n\
- **Reason:** The CNN scan suggests a fungal disease (Anthracnose), but the physical symptoms strongly point to a viral disease (Mosaic Virus).\n\
- **Recommendation:** Do not apply any chemical treatments yet. Isolate the plant if possible and seek advice from a local agricultural extension officer for a definitive identification.",
        )
    },
    // Healthy and abiotic stress
    direct(
        14,
        "healthy_plant",
        &[
            label!(Healthy),
            leaf!(NormalFirm),
            lesion!(No),
            sticky!(No),
            texture!(Smooth),
            firmness!(NormalFirm),
            smell!(Mild),
        ],
        "Likely Healthy",
        "All signs point to a healthy plant. Maintain your excellent work by continuing good agricultural practices:\n\
- **Weed Management:** Keep the area around the plant base clear of weeds that compete for nutrients and water.\n\
- **Soil Health:** Ensure good drainage and consider mulching to conserve soil moisture.\n\
- **Regular Scouting:** Continue to walk through your fields weekly to catch any potential issues early.",
    ),
    direct(
        15,
        "abiotic_stress",
        &[
            label!(Healthy),
            leaf!(DryBrittle),
            lesion!(No),
            firmness!(NormalFirm),
        ],
        "Likely Healthy with Minor Abiotic Stress",
        "No disease was detected. The symptoms are likely due to environmental factors:\n\
- **Water Stress:** Check the soil moisture. The leaves may be dry due to inconsistent watering. Ensure the crop gets adequate water, especially during dry spells.\n\
- **Sun Scorch:** If the dry spots are mainly on leaves exposed to direct, intense sunlight, it could be sun scorch. If this is a persistent problem, consider intercropping with taller plants to provide partial shade.",
    ),
    // Fallback
    Rule {
        category: RuleCategory::Fallback,
        salience: -1,
        fires_when: ActionGuard::NoPriorRecords,
        ..direct(
            16,
            "fallback",
            &[],
            "INCONCLUSIVE: No Clear Match",
            "The combination of symptoms provided does not match a specific disease profile in the knowledge base.\n\
- **Next Step:** For an accurate diagnosis, it is highly recommended to take clear photos and consult a local agricultural extension officer or a plant pathology lab.",
        )
    },
];
