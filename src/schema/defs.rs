/// Inclusive bounds observed in the training data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlausibleRange {
    pub min: f64,
    pub max: f64,
}

impl PlausibleRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FeatureDef {
    pub name: &'static str,
    pub description: &'static str,
    pub example: f64,
    pub range: PlausibleRange,
}

// Ranges are the min/max of the red wine training split.
const FEATURE_DEFS: &[FeatureDef] = &[
    FeatureDef {
        name: "fixed acidity",
        description: "Tartaric acid concentration (g/dm³)",
        example: 7.4,
        range: PlausibleRange {
            min: 4.6,
            max: 15.9,
        },
    },
    FeatureDef {
        name: "volatile acidity",
        description: "Acetic acid concentration (g/dm³)",
        example: 0.7,
        range: PlausibleRange {
            min: 0.12,
            max: 1.58,
        },
    },
    FeatureDef {
        name: "citric acid",
        description: "Citric acid concentration (g/dm³)",
        example: 0.0,
        range: PlausibleRange {
            min: 0.0,
            max: 1.0,
        },
    },
    FeatureDef {
        name: "residual sugar",
        description: "Residual sugar after fermentation (g/dm³)",
        example: 1.9,
        range: PlausibleRange {
            min: 0.9,
            max: 15.5,
        },
    },
    FeatureDef {
        name: "chlorides",
        description: "Sodium chloride concentration (g/dm³)",
        example: 0.076,
        range: PlausibleRange {
            min: 0.012,
            max: 0.611,
        },
    },
    FeatureDef {
        name: "free sulfur dioxide",
        description: "Free SO2 concentration (mg/dm³)",
        example: 11.0,
        range: PlausibleRange {
            min: 1.0,
            max: 72.0,
        },
    },
    FeatureDef {
        name: "total sulfur dioxide",
        description: "Total SO2 concentration (mg/dm³)",
        example: 34.0,
        range: PlausibleRange {
            min: 6.0,
            max: 289.0,
        },
    },
    FeatureDef {
        name: "density",
        description: "Wine density (g/cm³)",
        example: 0.9978,
        range: PlausibleRange {
            min: 0.99007,
            max: 1.00369,
        },
    },
    FeatureDef {
        name: "pH",
        description: "pH level of the wine",
        example: 3.51,
        range: PlausibleRange {
            min: 2.74,
            max: 4.01,
        },
    },
    FeatureDef {
        name: "sulphates",
        description: "Potassium sulphate concentration (g/dm³)",
        example: 0.56,
        range: PlausibleRange {
            min: 0.33,
            max: 2.0,
        },
    },
    FeatureDef {
        name: "alcohol",
        description: "Alcohol content (% by volume)",
        example: 9.4,
        range: PlausibleRange {
            min: 8.4,
            max: 14.9,
        },
    },
];

pub fn builtin_features() -> &'static [FeatureDef] {
    FEATURE_DEFS
}
