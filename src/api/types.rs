//! Tipos de dados trocados com a API de jobs do Convert Buddy.
//!
//! As structs derivam `Serialize` e `Deserialize` conforme o formato JSON
//! dos endpoints `POST /jobs/` e `GET /jobs/{job_id}`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Status de um job conforme reportado pelo servidor.
///
/// Valores desconhecidos são aceitos como [`JobStatus::Unknown`] em vez de
/// falhar a desserialização.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Queued,
    Processing,
    Done,
    Error,
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    /// `done` e `error` são terminais: nenhuma transição ocorre depois deles.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Error)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Queued => write!(f, "queued"),
            JobStatus::Processing => write!(f, "processing"),
            JobStatus::Done => write!(f, "done"),
            JobStatus::Error => write!(f, "error"),
            JobStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Resposta de sucesso de `POST /jobs/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedJob {
    /// Identificador opaco emitido pelo servidor.
    pub job_id: String,
    pub status: JobStatus,
    #[serde(default)]
    pub progress: Option<u32>,
}

/// Atualização bruta retornada por `GET /jobs/{job_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub status: JobStatus,
    #[serde(default)]
    pub progress: Option<u32>,
    /// Referência de download, relativa (`/files/...`) ou absoluta.
    #[serde(default)]
    pub download_url: Option<String>,
    /// Mensagem de erro quando `status = error`.
    #[serde(default)]
    pub error: Option<String>,
}

impl JobSnapshot {
    pub fn with_status(status: JobStatus) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }
}

/// Corpo de `GET /health/ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Health {
    #[serde(default)]
    pub ok: bool,
}
