//! Students, grades, and class statistics.

use crate::error::{KardexError, Result};
use crate::key::RecordKey;
use crate::model::{required_text, Record};
use crate::store::{RecordStore, StoreBackend};
use serde::{Deserialize, Serialize};

pub const GRADEBOOK_FILENAME: &str = "gradebook.json";

pub const GRADE_MIN: f64 = 0.0;
pub const GRADE_MAX: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub matricule: RecordKey,
    pub last_name: String,
    pub first_name: String,
    #[serde(default)]
    pub grades: Vec<f64>,
}

impl Student {
    /// Matricules are filed uppercased, the way registrars write them.
    pub fn new(matricule: &str, last_name: &str, first_name: &str) -> Result<Self> {
        Ok(Self {
            matricule: RecordKey::new(&matricule.to_uppercase())?,
            last_name: required_text("last_name", last_name)?,
            first_name: required_text("first_name", first_name)?,
            grades: Vec::new(),
        })
    }

    /// Arithmetic mean of the grades; 0 when there are none.
    pub fn mean(&self) -> f64 {
        if self.grades.is_empty() {
            return 0.0;
        }
        self.grades.iter().sum::<f64>() / self.grades.len() as f64
    }
}

impl Record for Student {
    fn key(&self) -> &RecordKey {
        &self.matricule
    }

    fn sort_key(&self) -> String {
        format!("{} {}", self.last_name.to_lowercase(), self.first_name.to_lowercase())
    }

    fn validate(&self) -> Result<()> {
        if self.last_name.trim().is_empty() {
            return Err(KardexError::validation("last_name", "must not be blank"));
        }
        if self.first_name.trim().is_empty() {
            return Err(KardexError::validation("first_name", "must not be blank"));
        }
        if let Some(bad) = self
            .grades
            .iter()
            .find(|g| !g.is_finite() || **g < GRADE_MIN || **g > GRADE_MAX)
        {
            return Err(KardexError::validation(
                "grade",
                format!("{} is outside [{}, {}]", bad, GRADE_MIN, GRADE_MAX),
            ));
        }
        Ok(())
    }
}

/// Snapshot of the whole class, for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassStats {
    pub student_count: usize,
    pub class_mean: f64,
    pub pass_rate: f64,
    pub passing: usize,
    pub failing: usize,
    pub best_student: Option<RecordKey>,
}

pub struct Gradebook<B: StoreBackend<Student>> {
    store: RecordStore<Student, B>,
    pass_threshold: f64,
}

impl<B: StoreBackend<Student>> Gradebook<B> {
    pub fn open(backend: B, pass_threshold: f64) -> Result<Self> {
        Ok(Self {
            store: RecordStore::open(backend)?,
            pass_threshold,
        })
    }

    pub fn register(&mut self, matricule: &str, last_name: &str, first_name: &str) -> Result<RecordKey> {
        let student = Student::new(matricule, last_name, first_name)?;
        let key = student.matricule.clone();
        self.store.add(student)?;
        Ok(key)
    }

    pub fn deregister(&mut self, matricule: &str) -> Result<Student> {
        self.store.remove(&RecordKey::new(matricule)?)
    }

    pub fn student(&self, matricule: &str) -> Result<&Student> {
        self.store.get(&RecordKey::new(matricule)?)
    }

    pub fn add_grade(&mut self, matricule: &str, grade: f64) -> Result<()> {
        let key = RecordKey::new(matricule)?;
        if !grade.is_finite() || !(GRADE_MIN..=GRADE_MAX).contains(&grade) {
            return Err(KardexError::validation(
                "grade",
                format!("must be between {} and {}", GRADE_MIN, GRADE_MAX),
            ));
        }
        self.store.update(&key, |student| student.grades.push(grade))
    }

    pub fn clear_grades(&mut self, matricule: &str) -> Result<()> {
        self.store
            .update(&RecordKey::new(matricule)?, |student| student.grades.clear())
    }

    pub fn mean(&self, matricule: &str) -> Result<f64> {
        Ok(self.student(matricule)?.mean())
    }

    pub fn is_passing(&self, matricule: &str) -> Result<bool> {
        Ok(self.student(matricule)?.mean() >= self.pass_threshold)
    }

    /// All students, ordered by last then first name.
    pub fn students(&self) -> Vec<&Student> {
        self.store.list()
    }

    pub fn student_count(&self) -> usize {
        self.store.len()
    }

    /// Mean of the student means; 0 for an empty class.
    pub fn class_mean(&self) -> f64 {
        if self.store.is_empty() {
            return 0.0;
        }
        let total = self.store.aggregate(0.0, |sum, s| sum + s.mean());
        total / self.store.len() as f64
    }

    /// Share of passing students, as a percentage; 0 for an empty class.
    pub fn pass_rate(&self) -> f64 {
        if self.store.is_empty() {
            return 0.0;
        }
        let passing = self.passing_count();
        (passing as f64 / self.store.len() as f64) * 100.0
    }

    pub fn best_student(&self) -> Option<&Student> {
        self.store
            .list()
            .into_iter()
            .max_by(|a, b| a.mean().total_cmp(&b.mean()))
    }

    pub fn class_stats(&self) -> ClassStats {
        let passing = self.passing_count();
        ClassStats {
            student_count: self.store.len(),
            class_mean: self.class_mean(),
            pass_rate: self.pass_rate(),
            passing,
            failing: self.store.len() - passing,
            best_student: self.best_student().map(|s| s.matricule.clone()),
        }
    }

    pub fn flush(&mut self) -> Result<()> {
        self.store.flush()
    }

    fn passing_count(&self) -> usize {
        self.store.aggregate(0usize, |count, s| {
            if s.mean() >= self.pass_threshold {
                count + 1
            } else {
                count
            }
        })
    }
}
