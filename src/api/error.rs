//! Tipos de erro para o cliente da API de jobs.
//!
//! Cada operação tem seu próprio enum para que o chamador saiba qual falha
//! interrompe o fluxo ([`SubmissionError`]) e qual é apenas registrada
//! ([`PollError`]).

use thiserror::Error;

/// Falhas ao criar um job. Interrompem a submissão: nenhum job é criado
/// e o polling não começa.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// Nenhum arquivo foi selecionado.
    #[error("no input files selected")]
    EmptySelection,

    /// O servidor respondeu com status diferente de 2xx.
    /// `body` é o corpo bruto da resposta (ex.: `"disk full"`).
    #[error("job submission failed (status {status}): {body}")]
    Rejected { status: u16, body: String },

    /// Falha de rede subjacente (DNS, conexão recusada).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Resposta 2xx que não pôde ser interpretada.
    #[error("invalid create-job response: {0}")]
    InvalidResponse(String),
}

impl SubmissionError {
    /// Texto mostrado ao usuário: o corpo bruto para respostas rejeitadas.
    pub fn user_message(&self) -> String {
        match self {
            SubmissionError::Rejected { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }
}

/// Falha em um único tick de polling. O loop registra e segue no próximo tick.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("status request failed (status {status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid status response: {0}")]
    InvalidResponse(String),
}

/// Falhas ao baixar o artefato final.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("download failed (status {status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}
