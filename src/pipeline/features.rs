//! Projection of a prepared record onto the model's numeric feature schema.

use ndarray::{Array1, Array2, ArrayView1, Axis};

use crate::{
    data::{CellValue, Record},
    error::{Result, RiskError},
};

/// Ordered fields the preterm classifier was trained on.
pub const FEATURE_SCHEMA: [&str; 30] = [
    "Abortus",
    "Partus",
    "occupation_siswa__mahasiswa",
    "occupation_pns",
    "occupation_karyawan_swasta",
    "occupation_wiraswasta__wirausaha",
    "occupation_ibu_rumah_tangga",
    "occupation_lainnya",
    "Previous pregnancy preeclampsia status",
    "Previous pregnancy eclampsia status",
    "Previous pregnancy convulsion status",
    "previous_preg_issue_gestational_",
    "Previous pregnancy heavy bleeding status",
    "Previous pregnancy macrosomia status",
    "Simplified Pregnancy Issues",
    "HIV status of the mother based on a test",
    "Hepatitis B status of the mother based on a test",
    "Syphilis status of the mother based on a test",
    "body_height",
    "body_weight",
    "mid_upper_arm_circum",
    "systolic_blood_pressure",
    "diastolic_blood_pressure",
    "Mother's age",
    "body_temperature",
    "pulse",
    "hemoglobinometer_result",
    "fasting_glucose_result",
    "random_glucose_test",
    "Status Baby",
];

/// A single-row numeric matrix with named columns.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    names: Vec<String>,
    values: Array2<f64>,
}

impl FeatureVector {
    /// Build from parallel names and values.
    pub fn new(names: Vec<String>, values: Vec<f64>) -> Result<Self> {
        if names.len() != values.len() {
            return Err(RiskError::Inference(format!(
                "{} feature names for {} values",
                names.len(),
                values.len()
            )));
        }
        let values = Array1::from_vec(values).insert_axis(Axis(0));
        Ok(Self { names, values })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Shape `(1, len)`.
    pub fn matrix(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn row(&self) -> ArrayView1<'_, f64> {
        self.values.row(0)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        let idx = self.names.iter().position(|n| n == name)?;
        Some(self.values[[0, idx]])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.row().into_iter().copied())
    }
}

/// Coerce one cell to a finite float. Numeric text such as `"0"` is accepted.
pub fn coerce(field: &str, value: &CellValue) -> Result<f64> {
    let number = match value {
        CellValue::Numeric(number) => *number,
        CellValue::Text(text) => text.trim().parse::<f64>().map_err(|_| {
            RiskError::coercion(field, format!("could not convert text {text:?} to float"))
        })?,
        CellValue::Missing => return Err(RiskError::coercion(field, "value is missing")),
    };
    if number.is_finite() {
        Ok(number)
    } else {
        Err(RiskError::coercion(field, format!("{number} is not a finite number")))
    }
}

/// Project `record` onto `schema`, in schema order.
pub fn assemble<S: AsRef<str>>(record: &Record, schema: &[S]) -> Result<FeatureVector> {
    let mut names = Vec::with_capacity(schema.len());
    let mut values = Vec::with_capacity(schema.len());
    for field in schema {
        let field = field.as_ref();
        let cell = record
            .get(field)
            .ok_or_else(|| RiskError::coercion(field, "column not present in record"))?;
        values.push(coerce(field, cell)?);
        names.push(field.to_string());
    }
    FeatureVector::new(names, values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_has_no_duplicates() {
        for (idx, name) in FEATURE_SCHEMA.iter().enumerate() {
            assert!(!FEATURE_SCHEMA[..idx].contains(name), "{name} repeated");
        }
    }

    #[test]
    fn coerce_accepts_numeric_text() {
        assert_eq!(coerce("Status Baby", &"0".into()).unwrap(), 0.0);
        assert_eq!(coerce("pulse", &" 88.5 ".into()).unwrap(), 88.5);
    }

    #[test]
    fn coerce_rejects_missing_and_nan() {
        assert!(coerce("pulse", &CellValue::Missing).is_err());
        assert!(coerce("pulse", &"nan".into()).is_err());
        assert!(coerce("pulse", &"tinggi".into()).is_err());
    }

    #[test]
    fn assembled_vector_is_single_row_in_schema_order() {
        let record = Record::from_pairs([("b", 2.0), ("a", 1.0), ("c", 3.0)]);
        let vector = assemble(&record, &["a", "b"]).unwrap();
        assert_eq!(vector.matrix().shape(), &[1, 2]);
        assert_eq!(vector.names(), ["a", "b"]);
        assert_eq!(vector.row().to_vec(), vec![1.0, 2.0]);
        assert_eq!(vector.get("b"), Some(2.0));
    }
}
