//! Interface de terminal do Convert Buddy — barra de progresso e saída colorida.
//!
//! Usa as crates `indicatif` para a barra de progresso e `console` para
//! estilização com cores. O [`JobProgress`] acompanha visualmente
//! um job de conversão no terminal.

use chrono::{DateTime, Utc};
use console::Style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use convert_buddy::api::JobStatus;
use convert_buddy::error::ConvertError;
use convert_buddy::selection::{InputSelection, TargetInfo};
use convert_buddy::status::JobView;

/// Indicador visual de progresso para um job no terminal.
///
/// Mostra o rótulo e a porcentagem atuais; ao final exibe o link de
/// download em verde ou a mensagem de erro em vermelho.
pub struct JobProgress {
    // Barra de progresso do indicatif (0–100).
    pb: ProgressBar,
    // Estilo verde para sucesso.
    green: Style,
    // Estilo vermelho para falha.
    red: Style,
    // Estilo amarelo para avisos.
    yellow: Style,
}

impl JobProgress {
    /// Cria a barra com o id do job como prefixo.
    pub fn start(job_id: &str) -> Self {
        let pb = ProgressBar::new(100);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} {prefix:.dim} [{bar:30.cyan/blue}] {pos:>3}% {msg}")
                .expect("invalid template")
                .progress_chars("=> "),
        );
        pb.set_prefix(job_id.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            pb,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
        }
    }

    /// Atualiza posição e rótulo a partir de uma view.
    pub fn update(&self, view: &JobView) {
        self.pb.set_position(u64::from(view.progress));
        self.pb.set_message(view.label);
    }

    /// Finaliza a barra e exibe o resultado final.
    pub fn complete(&self, view: &JobView) {
        self.pb.finish_and_clear();
        match view.status {
            JobStatus::Done => {
                println!("  {} Conversion completed", self.green.apply_to("✓"));
                if let Some(url) = &view.download_url {
                    println!("  Download: {url}");
                }
            }
            JobStatus::Error => {
                let error = view.error.as_deref().unwrap_or("unknown error");
                println!("  {} Conversion failed: {error}", self.red.apply_to("✗"));
            }
            _ => {
                println!(
                    "  {} Stopped while {}",
                    self.yellow.apply_to("■"),
                    view.label.to_lowercase()
                );
            }
        }
    }
}

/// Lista os arquivos selecionados com seus tamanhos.
pub fn print_selection(selection: &InputSelection) {
    let dim = Style::new().dim();
    for file in selection.files() {
        println!("  {} {}", file.name, dim.apply_to(format!("({} KB)", file.size_kb())));
    }
}

/// Imprime o catálogo de conversões.
pub fn print_targets(targets: &[TargetInfo]) {
    let bold = Style::new().bold();
    let dim = Style::new().dim();
    for target in targets {
        println!(
            "  {:<10} {}  {}",
            bold.apply_to(target.id),
            target.label,
            dim.apply_to(format!("options: {}", target.options_hint))
        );
    }
}

/// Resumo final de um job, impresso com `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    pub job_id: String,
    pub target: String,
    pub files: Vec<String>,
    pub view: JobView,
    pub submitted_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: i64,
}

impl JobSummary {
    pub fn new(
        job_id: String,
        target: String,
        files: Vec<String>,
        view: JobView,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        let finished_at = Utc::now();
        Self {
            job_id,
            target,
            files,
            view,
            submitted_at,
            finished_at,
            duration_ms: (finished_at - submitted_at).num_milliseconds(),
        }
    }

    pub fn to_json(&self) -> Result<String, ConvertError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
