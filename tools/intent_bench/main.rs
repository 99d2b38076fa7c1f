//! Intent Bench - CSV-driven accuracy harness for the triagem daemon.
//!
//! Replays a labeled corpus of utterances against a running instance,
//! prints per-case results, and writes a JSON report with accuracy,
//! latency and the aggregate score.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;
use triagem_common::{FindServiceRequest, FindServiceResponse};

#[derive(Parser)]
#[command(name = "intent_bench")]
#[command(about = "Replay a labeled intent corpus against a running triagem daemon", long_about = None)]
struct Cli {
    /// CSV corpus: utterance,expected_id,expected_name (with header row)
    #[arg(default_value = "assets/intents_pre_loaded.csv")]
    corpus: PathBuf,

    /// Base URL of the daemon under test
    #[arg(long, env = "API_URL", default_value = "http://localhost:8080")]
    api_url: String,

    /// Where to write the JSON report
    #[arg(long, default_value = "report.json")]
    report: PathBuf,
}

#[derive(Debug, Clone)]
struct CorpusCase {
    intent: String,
    expected_id: u32,
    expected_name: String,
}

#[derive(Debug, Serialize)]
struct CaseResult {
    intent: String,
    expected_id: u32,
    expected_name: String,
    actual_id: u32,
    actual_name: String,
    success: bool,
    response_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct Report {
    timestamp: String,
    total_tests: usize,
    successes: usize,
    failures: usize,
    accuracy: f64,
    avg_time_ms: u64,
    total_time_ms: u64,
    estimated_score: f64,
    results: Vec<CaseResult>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    println!("Testando API: {}", cli.api_url);
    println!("Corpus: {}\n", cli.corpus.display());

    let cases = read_corpus(&cli.corpus)?;
    if cases.is_empty() {
        anyhow::bail!("corpus vazio: {}", cli.corpus.display());
    }

    println!("Executando {} testes...\n", cases.len());

    let client = reqwest::Client::new();
    let mut results = Vec::with_capacity(cases.len());
    let mut successes = 0usize;
    let mut failures = 0usize;
    let mut total_time_ms = 0u64;

    for (i, case) in cases.iter().enumerate() {
        let result = run_case(&client, &cli.api_url, case).await;
        total_time_ms += result.response_time_ms;

        if result.success {
            successes += 1;
            println!(
                "[OK]   [{}/{}] {}ms - {}",
                i + 1,
                cases.len(),
                result.response_time_ms,
                case.intent
            );
        } else {
            failures += 1;
            println!(
                "[FAIL] [{}/{}] {}ms - {}",
                i + 1,
                cases.len(),
                result.response_time_ms,
                case.intent
            );
            println!(
                "       Esperado: ID {} ({})",
                case.expected_id, case.expected_name
            );
            println!(
                "       Recebido: ID {} ({})",
                result.actual_id, result.actual_name
            );
            if let Some(error) = &result.error {
                println!("       Erro: {}", error);
            }
        }

        results.push(result);
    }

    let report = build_report(results, successes, failures, total_time_ms);
    print_summary(&report);

    save_report(&report, &cli.report)?;
    println!("Relatório salvo em: {}", cli.report.display());

    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// Read the labeled corpus. Malformed rows are skipped with a warning,
/// and an unparseable expected id counts as 0 (never matches).
fn read_corpus(path: &Path) -> Result<Vec<CorpusCase>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Falha ao abrir corpus {}", path.display()))?;

    let mut cases = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let line = idx + 2; // 1-based, after the header
        let record = record.with_context(|| format!("Registro CSV inválido na linha {line}"))?;
        if record.len() < 3 {
            eprintln!("[!]  Linha {line}: formato inválido, ignorando");
            continue;
        }
        cases.push(CorpusCase {
            intent: record[0].to_string(),
            expected_id: record[1].trim().parse().unwrap_or(0),
            expected_name: record[2].to_string(),
        });
    }
    Ok(cases)
}

async fn run_case(client: &reqwest::Client, api_url: &str, case: &CorpusCase) -> CaseResult {
    let start = Instant::now();
    let outcome = call_find_service(client, api_url, &case.intent).await;
    let response_time_ms = start.elapsed().as_millis() as u64;

    match outcome {
        Ok((actual_id, actual_name)) => CaseResult {
            intent: case.intent.clone(),
            expected_id: case.expected_id,
            expected_name: case.expected_name.clone(),
            actual_id,
            actual_name,
            success: actual_id == case.expected_id,
            response_time_ms,
            error: None,
        },
        Err(error) => CaseResult {
            intent: case.intent.clone(),
            expected_id: case.expected_id,
            expected_name: case.expected_name.clone(),
            actual_id: 0,
            actual_name: String::new(),
            success: false,
            response_time_ms,
            error: Some(error),
        },
    }
}

/// One POST to /api/find-service. Errors come back as display strings so
/// the report serializes them as-is.
async fn call_find_service(
    client: &reqwest::Client,
    api_url: &str,
    intent: &str,
) -> std::result::Result<(u32, String), String> {
    let response = client
        .post(format!("{api_url}/api/find-service"))
        .json(&FindServiceRequest {
            intent: intent.to_string(),
        })
        .send()
        .await
        .map_err(|e| format!("HTTP error: {e}"))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(format!("Status {status}: {body}"));
    }

    let body: FindServiceResponse = response
        .json()
        .await
        .map_err(|e| format!("JSON decode error: {e}"))?;

    if !body.success {
        return Err(body.error.unwrap_or_else(|| "erro desconhecido".to_string()));
    }

    let data = body.data.ok_or_else(|| "data is null".to_string())?;
    Ok((data.service_id, data.service_name))
}

/// Aggregate score: +10 per pass, -50 per fail, minus a latency penalty.
fn estimated_score(successes: usize, failures: usize, avg_time_ms: f64) -> f64 {
    (successes as f64 * 10.0) - (failures as f64 * 50.0) - (avg_time_ms * 0.01)
}

fn build_report(
    results: Vec<CaseResult>,
    successes: usize,
    failures: usize,
    total_time_ms: u64,
) -> Report {
    let total_tests = results.len();
    let avg_time_ms = total_time_ms / total_tests as u64;
    Report {
        timestamp: Utc::now().to_rfc3339(),
        total_tests,
        successes,
        failures,
        accuracy: successes as f64 / total_tests as f64 * 100.0,
        avg_time_ms,
        total_time_ms,
        estimated_score: estimated_score(successes, failures, avg_time_ms as f64),
        results,
    }
}

fn print_summary(report: &Report) {
    let divider = "============================================================";
    println!("\n{divider}");
    println!("RELATÓRIO FINAL");
    println!("{divider}");
    println!("Total de testes: {}", report.total_tests);
    println!("Sucessos: {} ({:.1}%)", report.successes, report.accuracy);
    println!(
        "Falhas: {} ({:.1}%)",
        report.failures,
        report.failures as f64 / report.total_tests as f64 * 100.0
    );
    println!("Tempo médio: {}ms", report.avg_time_ms);
    println!("Tempo total: {:.2}s\n", report.total_time_ms as f64 / 1000.0);

    println!("SCORE ESTIMADO: {:.2} pontos", report.estimated_score);
    println!("   Sucessos: {:.0} pts", report.successes as f64 * 10.0);
    println!("   Falhas: {:.0} pts", report.failures as f64 * -50.0);
    println!("   Tempo: -{:.2} pts\n", report.avg_time_ms as f64 * 0.01);
}

fn save_report(report: &Report, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Não foi possível salvar relatório em {}", path.display()))?;
    serde_json::to_writer_pretty(file, report).context("Falha ao escrever relatório")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case_result(success: bool, ms: u64) -> CaseResult {
        CaseResult {
            intent: "saldo disponível".to_string(),
            expected_id: 12,
            expected_name: "Consulta do Saldo".to_string(),
            actual_id: if success { 12 } else { 0 },
            actual_name: String::new(),
            success,
            response_time_ms: ms,
            error: None,
        }
    }

    #[test]
    fn test_estimated_score_formula() {
        // 10 passes, no failures, 100ms average
        assert_eq!(estimated_score(10, 0, 100.0), 99.0);
        // a failure costs five passes
        assert_eq!(estimated_score(0, 1, 0.0), -50.0);
    }

    #[test]
    fn test_build_report_aggregates() {
        let results = vec![case_result(true, 100), case_result(true, 200), case_result(false, 300)];
        let report = build_report(results, 2, 1, 600);

        assert_eq!(report.total_tests, 3);
        assert_eq!(report.avg_time_ms, 200);
        assert!((report.accuracy - 66.666).abs() < 0.01);
        assert_eq!(
            report.estimated_score,
            estimated_score(2, 1, 200.0)
        );
    }

    #[test]
    fn test_save_report_writes_parseable_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let report = build_report(vec![case_result(true, 50)], 1, 0, 50);

        save_report(&report, &path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed["total_tests"], 1);
        assert_eq!(parsed["successes"], 1);
        assert_eq!(parsed["results"][0]["intent"], "saldo disponível");
    }

    #[test]
    fn test_read_corpus_skips_short_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.csv");
        std::fs::write(
            &path,
            "intent,expected_id,expected_name\nsaldo disponível,12,Consulta do Saldo\nsó duas,colunas\nquero meu boleto,3,Segunda via de Fatura\n",
        )
        .unwrap();

        let cases = read_corpus(&path).unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].expected_id, 12);
        assert_eq!(cases[1].intent, "quero meu boleto");
    }
}
