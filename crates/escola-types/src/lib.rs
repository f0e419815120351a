//! Record types shared across the Escola crates.
//!
//! Each stored entity has two shapes: the full row as it lives in the store
//! (with its generated `id`), and the payload a client sends to create or
//! replace it. Field names match the column names of the backing tables and
//! are used verbatim on the wire.

use serde::{Deserialize, Serialize};

/// Store-assigned row identifier.
///
/// Identifiers are generated on insert and never reused.
pub type RecordId = i64;

/// A student row from `tbl_alunos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Generated identifier.
    pub id: RecordId,
    /// Full name.
    pub nome: String,
    /// National id (CPF).
    pub cpf: String,
    /// Age in years.
    pub idade: i64,
}

/// Payload for creating or replacing a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentPayload {
    pub nome: String,
    pub cpf: String,
    pub idade: i64,
}

/// A subject row from `tbl_disciplinas`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Generated identifier.
    pub id: RecordId,
    /// Subject name.
    pub nome: String,
    /// Number of classes in the subject.
    pub aulas: i64,
}

/// Payload for creating or replacing a subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectPayload {
    pub nome: String,
    pub aulas: i64,
}

/// An enrollment row from `tbl_matriculas`, linking a student to a subject.
///
/// Both foreign keys are checked by the store, not by this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    /// Generated identifier.
    pub id: RecordId,
    /// The enrolled student.
    pub id_aluno: RecordId,
    /// The subject enrolled in.
    pub id_disciplina: RecordId,
}

/// Payload for creating an enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentPayload {
    pub id_aluno: RecordId,
    pub id_disciplina: RecordId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_serializes_with_column_names() {
        let student = Student {
            id: 7,
            nome: "Ana".to_string(),
            cpf: "111".to_string(),
            idade: 20,
        };
        let value = serde_json::to_value(&student).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"id": 7, "nome": "Ana", "cpf": "111", "idade": 20})
        );
    }

    #[test]
    fn student_payload_rejects_non_integer_age() {
        let result: Result<StudentPayload, _> =
            serde_json::from_str(r#"{"nome": "Ana", "cpf": "111", "idade": "vinte"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn enrollment_payload_requires_both_keys() {
        let result: Result<EnrollmentPayload, _> = serde_json::from_str(r#"{"id_aluno": 1}"#);
        assert!(result.is_err());
    }
}
