//! Integration tests for faview
//!
//! Fixtures are written to a temporary directory: a plain FASTA, a BGZF copy
//! split into several blocks, and their `.fai` / `.gzi` indexes.

use axum::http::StatusCode;
use axum_test::TestServer;
use faview::{
    formats::open_source,
    handlers::{AppState, create_router},
    locations, render, resolver,
    session::Viewer,
    storage::FileOpener,
};
use flate2::{Compression, Crc, write::DeflateEncoder};
use serde_json::Value;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

const LINE_BASES: usize = 20;
const BLOCK_SIZE: usize = 37;

struct Genome {
    _dir: TempDir,
    plain: String,
    bgzip: String,
    sequences: Vec<(String, String)>,
}

fn sequences() -> Vec<(String, String)> {
    let one = "ACGT".repeat(24)[..95].to_string();
    let two = format!("AAAATTTTGGGGCCC{}", "A".repeat(25));
    vec![("1".to_string(), one), ("2".to_string(), two)]
}

/// Build FASTA text wrapped at `LINE_BASES` and its `.fai`.
fn fasta_and_fai(sequences: &[(String, String)]) -> (Vec<u8>, String) {
    let mut fasta = Vec::new();
    let mut fai = String::new();

    for (name, seq) in sequences {
        fasta.extend_from_slice(format!(">{} test sequence\n", name).as_bytes());
        let offset = fasta.len();
        for line in seq.as_bytes().chunks(LINE_BASES) {
            fasta.extend_from_slice(line);
            fasta.push(b'\n');
        }
        fai.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\n",
            name,
            seq.len(),
            offset,
            LINE_BASES,
            LINE_BASES + 1
        ));
    }

    (fasta, fai)
}

/// One BGZF block: a gzip member with the `BC` extra subfield.
fn bgzf_block(data: &[u8]) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    let deflated = encoder.finish().unwrap();

    let mut crc = Crc::new();
    crc.update(data);

    let block_size = (18 + deflated.len() + 8 - 1) as u16;
    let mut block = vec![
        0x1f, 0x8b, 8, 4, 0, 0, 0, 0, 0, 0xff, 6, 0, b'B', b'C', 2, 0,
    ];
    block.extend_from_slice(&block_size.to_le_bytes());
    block.extend_from_slice(&deflated);
    block.extend_from_slice(&crc.sum().to_le_bytes());
    block.extend_from_slice(&(data.len() as u32).to_le_bytes());
    block
}

/// Compress into fixed-size BGZF blocks plus the EOF block, returning the
/// file and its `.gzi`.
fn bgzip(data: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let mut compressed = Vec::new();
    let mut entries = Vec::new();

    for (i, chunk) in data.chunks(BLOCK_SIZE).enumerate() {
        if i > 0 {
            entries.push((compressed.len() as u64, (i * BLOCK_SIZE) as u64));
        }
        compressed.extend(bgzf_block(chunk));
    }
    compressed.extend(bgzf_block(b""));

    let mut gzi = (entries.len() as u64).to_le_bytes().to_vec();
    for (c, u) in entries {
        gzi.extend_from_slice(&c.to_le_bytes());
        gzi.extend_from_slice(&u.to_le_bytes());
    }

    (compressed, gzi)
}

fn write_genome() -> Genome {
    let dir = tempfile::tempdir().unwrap();
    let sequences = sequences();
    let (fasta, fai) = fasta_and_fai(&sequences);
    let (compressed, gzi) = bgzip(&fasta);

    let write = |name: &str, data: &[u8]| {
        let path = dir.path().join(name);
        std::fs::write(&path, data).unwrap();
        path
    };

    let plain = write("genome.fa", &fasta);
    write("genome.fa.fai", fai.as_bytes());
    let bgzip = write("genome.fa.gz", &compressed);
    write("genome.fa.gz.fai", fai.as_bytes());
    write("genome.fa.gz.gzi", &gzi);

    Genome {
        plain: path_string(&plain),
        bgzip: path_string(&bgzip),
        sequences,
        _dir: dir,
    }
}

fn path_string(path: &Path) -> String {
    path.to_str().unwrap().to_string()
}

fn opener() -> FileOpener {
    FileOpener::new(Duration::from_secs(5)).unwrap()
}

fn create_test_server() -> TestServer {
    let opener = opener();
    let state = AppState {
        viewer: Arc::new(Viewer::with_opener(opener.clone())),
        opener,
    };

    // Use centralized router definition
    let app = create_router(state);

    TestServer::new(app).unwrap()
}

async fn fetch(url: &str, text: &str) -> faview::Result<String> {
    let source = open_source(&opener(), url)?;
    let regions = resolver::resolve(source, locations::parse(text)).await?;
    Ok(render::fasta_records(&regions))
}

#[tokio::test]
async fn test_end_to_end_two_regions() {
    let genome = write_genome();

    for url in [&genome.plain, &genome.bgzip] {
        let output = fetch(url, "1:1-10\n2:5-15").await.unwrap();
        assert_eq!(output, ">1:1-10\nACGTACGTAC\n>2:5-15\nTTTTGGGGCCC\n");
    }
}

#[tokio::test]
async fn test_plain_and_bgzip_agree() {
    let genome = write_genome();
    let plain = open_source(&opener(), &genome.plain).unwrap();
    let bgzip = open_source(&opener(), &genome.bgzip).unwrap();

    // Line breaks fall every 20 residues and block breaks every 37 bytes
    let regions = [
        ("1", 1, 95),
        ("1", 18, 23),
        ("1", 20, 21),
        ("1", 33, 41),
        ("1", 90, 200),
        ("2", 1, 40),
        ("2", 15, 26),
    ];

    let text = regions
        .iter()
        .map(|(name, start, end)| format!("{}:{}-{}", name, start, end))
        .collect::<Vec<_>>()
        .join("\n");

    let from_plain = resolver::resolve(plain, locations::parse(&text)).await.unwrap();
    let from_bgzip = resolver::resolve(bgzip, locations::parse(&text)).await.unwrap();
    assert_eq!(from_plain, from_bgzip);

    for ((name, start, end), resolved) in regions.iter().zip(&from_plain) {
        let seq = &genome
            .sequences
            .iter()
            .find(|(n, _)| n == name)
            .unwrap()
            .1;
        let end = (*end).min(seq.len());
        assert_eq!(resolved.residues.as_deref(), Some(&seq[start - 1..end]));
    }
}

#[tokio::test]
async fn test_missing_sequence_renders_empty_record() {
    let genome = write_genome();

    let output = fetch(&genome.bgzip, "chrUn:1-10\n1:1-4").await.unwrap();
    assert_eq!(output, ">chrUn:1-10\n\n>1:1-4\nACGT\n");
}

#[tokio::test]
async fn test_malformed_region_fails_whole_batch() {
    let genome = write_genome();

    let result = fetch(&genome.plain, "1:1-10\n1:ten-20").await;
    assert!(matches!(result, Err(faview::Error::MalformedRegion(_))));
}

#[tokio::test]
async fn test_missing_gzi_fails() {
    let genome = write_genome();
    std::fs::remove_file(format!("{}.gzi", genome.bgzip)).unwrap();

    let result = fetch(&genome.bgzip, "1:1-10").await;
    assert!(matches!(result, Err(faview::Error::NotFound(_))));
}

#[tokio::test]
async fn test_residues_endpoint() {
    let genome = write_genome();
    let server = create_test_server();

    let response = server
        .get("/residues")
        .add_query_param("url", &genome.bgzip)
        .add_query_param("locations", "1:1-10\n2:5-15")
        .await;
    response.assert_status_ok();

    assert_eq!(response.header("content-type"), "text/x-fasta");
    assert_eq!(
        response.text(),
        ">1:1-10\nACGTACGTAC\n>2:5-15\nTTTTGGGGCCC\n"
    );
}

#[tokio::test]
async fn test_residues_endpoint_malformed_region() {
    let genome = write_genome();
    let server = create_test_server();

    let response = server
        .get("/residues")
        .add_query_param("url", &genome.plain)
        .add_query_param("locations", "1")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["error"], "MalformedRegion");
}

#[tokio::test]
async fn test_residues_endpoint_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let missing = path_string(&dir.path().join("missing.fa"));
    let server = create_test_server();

    let response = server
        .get("/residues")
        .add_query_param("url", &missing)
        .add_query_param("locations", "1:1-10")
        .await;
    response.assert_status_not_found();

    let body: Value = response.json();
    assert_eq!(body["error"], "NotFound");
}

#[tokio::test]
async fn test_sequences_endpoint() {
    let genome = write_genome();
    let server = create_test_server();

    let response = server
        .get("/sequences")
        .add_query_param("url", &genome.plain)
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    let sequences = body.as_array().unwrap();
    assert_eq!(sequences.len(), 2);
    assert_eq!(sequences[0]["name"], "1");
    assert_eq!(sequences[0]["length"], 95);
    assert_eq!(sequences[1]["name"], "2");
    assert_eq!(sequences[1]["length"], 40);
}

#[tokio::test]
async fn test_viewer_page_flow() {
    let genome = write_genome();
    let server = create_test_server();

    let response = server.get("/").await;
    response.assert_status_ok();
    assert!(response.text().contains("<form"));

    let response = server
        .post("/")
        .form(&[("url", genome.bgzip.as_str()), ("locations", "1:1-10\n2:5-15")])
        .await;
    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("&gt;1:1-10\nACGTACGTAC\n&gt;2:5-15\nTTTTGGGGCCC\n"));
    assert!(!html.contains("class=\"error\""));

    // The page keeps showing the last applied cycle
    let html = server.get("/").await.text();
    assert!(html.contains("ACGTACGTAC"));
}

#[tokio::test]
async fn test_viewer_page_shows_errors() {
    let genome = write_genome();
    let server = create_test_server();

    let response = server
        .post("/")
        .form(&[("url", genome.plain.as_str()), ("locations", "1:1-10\nnot a region")])
        .await;
    response.assert_status_ok();

    let html = response.text();
    assert!(html.contains("class=\"error\""));
    assert!(html.contains("malformed region"));
    assert!(!html.contains("ACGTACGTAC"));
}
