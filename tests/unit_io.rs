// Filesystem-level tests: corpus loading, word-list persistence, and the
// artifacts a refinement run leaves behind.

use std::collections::HashSet;
use std::fs;

use indicatif::ProgressBar;

use stoprefine::corpus::Corpus;
use stoprefine::output::artifacts::{rendering_path, top_terms_path, ArtifactWriter};
use stoprefine::output::render::{FrequencyRenderer, JsonRenderer};
use stoprefine::refine::iteration::{run, RefineParams};
use stoprefine::refine::tokenizer::Tokenizer;
use stoprefine::stopwords::baseline::{load_baseline, MANUAL_STOPWORDS};
use stoprefine::stopwords::store::{read_word_list, write_stopword_set, write_word_list};
use stoprefine::stopwords::StopwordSet;

// ============================================================
// Word lists
// ============================================================

#[test]
fn word_list_round_trip_preserves_set() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("stopwords_final.txt");
    let set: StopwordSet = ["été", "journal", "aujourd'hui", "kb"].into_iter().collect();

    let written = write_stopword_set(&path, &set).unwrap();
    assert_eq!(written, 4);

    let back: StopwordSet = read_word_list(&path).unwrap().into_iter().collect();
    assert_eq!(back, set);
}

#[test]
fn word_list_is_sorted_and_newline_terminated() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("list.txt");
    write_word_list(&path, ["mot", "abc", "mot"]).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "abc\nmot\n");
}

#[test]
fn word_list_reader_skips_blank_lines_and_trims() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("list.txt");
    fs::write(&path, "  usine \n\n\nferme\r\n").unwrap();
    assert_eq!(read_word_list(&path).unwrap(), vec!["usine", "ferme"]);
}

#[test]
fn baseline_includes_previous_extra_list() {
    let dir = tempfile::TempDir::new().unwrap();
    let extra = dir.path().join("stopwords_extra.txt");
    fs::write(&extra, "Quotidien\nrédaction\n").unwrap();

    let set = load_baseline(&extra).unwrap();
    assert!(set.contains("quotidien"));
    assert!(set.contains("rédaction"));
    assert!(set.contains("tél"));
    assert!(set.len() > MANUAL_STOPWORDS.len() + 2);
}

// ============================================================
// Corpus loading
// ============================================================

#[test]
fn corpus_load_groups_documents_and_falls_back_to_latin1() {
    let dir = tempfile::TempDir::new().unwrap();
    let txt = dir.path().join("txt");
    fs::create_dir(&txt).unwrap();
    fs::write(txt.join("a_1951.txt"), "le journal").unwrap();
    // "été" encoded as ISO-8859-1
    fs::write(txt.join("b_1952.txt"), [0xE9, b't', 0xE9]).unwrap();
    fs::write(txt.join("ignored.md"), "not a document").unwrap();

    let csv = dir.path().join("clusters_1950_1959.csv");
    fs::write(&csv, "filename,cluster\na_1951.txt,1\nb_1952.txt,0\nmissing.txt,0\n").unwrap();

    let corpus = Corpus::load(&csv, &txt).unwrap();
    assert_eq!(corpus.cluster_count(), 2);
    assert_eq!(corpus.document_count(), 2);

    let clusters: Vec<_> = corpus.clusters().collect();
    assert_eq!(clusters[0].0, 0);
    assert_eq!(clusters[0].1[0].text, "été");
    assert_eq!(clusters[1].1[0].filename, "a_1951.txt");
}

#[test]
fn corpus_load_fails_fast_without_clusters_table() {
    let dir = tempfile::TempDir::new().unwrap();
    // The document directory does not exist either; the table check comes first
    let err = Corpus::load(&dir.path().join("clusters.csv"), &dir.path().join("txt")).unwrap_err();
    assert!(err.to_string().contains("Clusters table not found"));
}

// ============================================================
// Artifacts
// ============================================================

#[test]
fn run_writes_tables_and_skips_empty_renderings() {
    let dir = tempfile::TempDir::new().unwrap();
    let txt = dir.path().join("txt");
    fs::create_dir(&txt).unwrap();
    fs::write(txt.join("a.txt"), "commun commun usine").unwrap();
    fs::write(txt.join("b.txt"), "commun commun ferme").unwrap();
    // Everything in this document is a baseline stopword
    fs::write(txt.join("c.txt"), "le la les").unwrap();
    let csv = dir.path().join("clusters.csv");
    fs::write(&csv, "filename,cluster\na.txt,0\nb.txt,1\nc.txt,2\n").unwrap();

    let corpus = Corpus::load(&csv, &txt).unwrap();
    let baseline: StopwordSet = ["le", "la", "les"].into_iter().collect();
    let params = RefineParams {
        iterations: 2,
        top_k: 1,
        ..RefineParams::default()
    };

    let renderer = JsonRenderer;
    let mut writer = ArtifactWriter::new(dir.path(), Some(&renderer as &dyn FrequencyRenderer));
    let result = run(&corpus, &Tokenizer::new(), baseline, &params, &mut writer).unwrap();

    assert_eq!(result.iterations[0].added, vec!["commun"]);

    for iteration in 1..=2 {
        let table = fs::read_to_string(top_terms_path(dir.path(), iteration)).unwrap();
        assert_eq!(table, "0,usine\n1,ferme\n2,\n");
        assert!(rendering_path(dir.path(), 0, iteration, "json").exists());
        assert!(rendering_path(dir.path(), 1, iteration, "json").exists());
        assert!(!rendering_path(dir.path(), 2, iteration, "json").exists());
    }

    let unique: HashSet<_> = writer.written.iter().collect();
    assert_eq!(unique.len(), writer.written.len());
    assert_eq!(writer.written.len(), 6);
}

#[test]
fn progress_bar_is_cleared_when_a_run_fails() {
    let dir = tempfile::TempDir::new().unwrap();
    let txt = dir.path().join("txt");
    fs::create_dir(&txt).unwrap();
    fs::write(txt.join("a.txt"), "commun usine").unwrap();
    let csv = dir.path().join("clusters.csv");
    fs::write(&csv, "filename,cluster\na.txt,0\n").unwrap();
    let corpus = Corpus::load(&csv, &txt).unwrap();

    // Writing into a directory that does not exist fails in the first iteration
    let missing = dir.path().join("no_such_dir");
    let pb = ProgressBar::hidden();
    let mut writer = ArtifactWriter::new(&missing, None).with_progress(pb.clone());
    let params = RefineParams {
        iterations: 2,
        ..RefineParams::default()
    };

    let err = run(&corpus, &Tokenizer::new(), StopwordSet::new(), &params, &mut writer).unwrap_err();
    assert!(err.to_string().contains("Failed to write"));
    assert!(pb.is_finished());
    assert!(writer.written.is_empty());
}

#[test]
fn progress_bar_is_cleared_when_a_run_completes() {
    let dir = tempfile::TempDir::new().unwrap();
    let txt = dir.path().join("txt");
    fs::create_dir(&txt).unwrap();
    fs::write(txt.join("a.txt"), "commun usine").unwrap();
    let csv = dir.path().join("clusters.csv");
    fs::write(&csv, "filename,cluster\na.txt,0\n").unwrap();
    let corpus = Corpus::load(&csv, &txt).unwrap();

    let pb = ProgressBar::hidden();
    let mut writer = ArtifactWriter::new(dir.path(), None).with_progress(pb.clone());
    let params = RefineParams {
        iterations: 2,
        ..RefineParams::default()
    };

    run(&corpus, &Tokenizer::new(), StopwordSet::new(), &params, &mut writer).unwrap();
    assert!(pb.is_finished());
    assert_eq!(pb.position(), 2);
}
