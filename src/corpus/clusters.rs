// Clusters table — the (filename, cluster) assignments produced by the
// clustering step, read from a CSV file with a header row.

use std::path::Path;

use anyhow::{Context, Result};

/// One row of the clusters table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterAssignment {
    pub filename: String,
    pub cluster: i64,
}

/// Read the clusters CSV at `path`.
///
/// A missing file is fatal: nothing can be refined without cluster
/// assignments, so the caller should surface this before doing any work.
pub fn read_clusters_csv(path: &Path) -> Result<Vec<ClusterAssignment>> {
    if !path.exists() {
        anyhow::bail!(
            "Clusters table not found at {}\n\
             Run the clustering step first (it writes clusters_<decade>.csv).",
            path.display()
        );
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read clusters table {}", path.display()))?;
    parse_clusters_csv(&content)
        .with_context(|| format!("Malformed clusters table {}", path.display()))
}

/// Parse clusters CSV content. The header must name a `filename` and a
/// `cluster` column; other columns are ignored.
pub fn parse_clusters_csv(content: &str) -> Result<Vec<ClusterAssignment>> {
    let mut records = split_csv_records(content.trim_start_matches('\u{feff}')).into_iter();

    let Some((_, columns)) = records.next() else {
        anyhow::bail!("clusters table is empty (no header row)");
    };
    let filename_col = column_index(&columns, "filename")?;
    let cluster_col = column_index(&columns, "cluster")?;

    let mut rows = Vec::new();
    for (line_no, fields) in records {
        let filename = fields
            .get(filename_col)
            .with_context(|| format!("line {line_no}: missing filename field"))?;
        let raw_cluster = fields
            .get(cluster_col)
            .with_context(|| format!("line {line_no}: missing cluster field"))?;
        let cluster = parse_cluster_id(raw_cluster)
            .with_context(|| format!("line {line_no}: invalid cluster id {raw_cluster:?}"))?;
        rows.push(ClusterAssignment {
            filename: filename.clone(),
            cluster,
        });
    }
    Ok(rows)
}

fn column_index(columns: &[String], name: &str) -> Result<usize> {
    columns
        .iter()
        .position(|c| c.trim() == name)
        .with_context(|| format!("header has no `{name}` column (found: {})", columns.join(", ")))
}

/// Cluster ids come from a numeric column and may have been written as
/// floats ("3.0") by some dataframe writers.
fn parse_cluster_id(raw: &str) -> Result<i64> {
    let raw = raw.trim();
    if let Ok(id) = raw.parse::<i64>() {
        return Ok(id);
    }
    let float: f64 = raw.parse()?;
    if float.fract() != 0.0 || !float.is_finite() {
        anyhow::bail!("not an integer");
    }
    Ok(float as i64)
}

/// Split CSV content into records, each tagged with the line it starts on.
///
/// Double-quoted fields may hold commas, `""` escapes and line breaks.
/// Blank lines outside quotes are skipped.
fn split_csv_records(content: &str) -> Vec<(usize, Vec<String>)> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if current.is_empty() => in_quotes = true,
            '\n' if in_quotes => {
                current.push(c);
                line += 1;
            }
            '\n' => {
                fields.push(std::mem::take(&mut current));
                push_record(&mut records, record_line, std::mem::take(&mut fields));
                line += 1;
                record_line = line;
            }
            '\r' if !in_quotes => {}
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    push_record(&mut records, record_line, fields);
    records
}

fn push_record(records: &mut Vec<(usize, Vec<String>)>, line: usize, fields: Vec<String>) {
    let blank = fields.len() == 1 && fields[0].trim().is_empty();
    if !blank {
        records.push((line, fields));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let rows = parse_clusters_csv("filename,cluster\na_1951.txt,0\nb_1952.txt,2\n").unwrap();
        assert_eq!(
            rows,
            vec![
                ClusterAssignment { filename: "a_1951.txt".into(), cluster: 0 },
                ClusterAssignment { filename: "b_1952.txt".into(), cluster: 2 },
            ]
        );
    }

    #[test]
    fn test_parse_reordered_columns_and_quotes() {
        let csv = "cluster,extra,filename\n1,x,\"le \"\"journal\"\", 1953.txt\"\n";
        let rows = parse_clusters_csv(csv).unwrap();
        assert_eq!(rows[0].filename, "le \"journal\", 1953.txt");
        assert_eq!(rows[0].cluster, 1);
    }

    #[test]
    fn test_parse_quoted_field_spanning_lines() {
        let csv = "filename,cluster\r\n\"revue\nn1.txt\",1\r\n\r\nc.txt,2\r\n";
        let rows = parse_clusters_csv(csv).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].filename, "revue\nn1.txt");
        assert_eq!(rows[1], ClusterAssignment { filename: "c.txt".into(), cluster: 2 });
    }

    #[test]
    fn test_line_numbers_count_embedded_newlines() {
        let err = parse_clusters_csv("filename,cluster\n\"a\nb.txt\",1\nc.txt,x\n").unwrap_err();
        assert!(format!("{err:#}").contains("line 4"));
    }

    #[test]
    fn test_parse_float_cluster_id() {
        let rows = parse_clusters_csv("filename,cluster\na.txt,3.0\n").unwrap();
        assert_eq!(rows[0].cluster, 3);
    }

    #[test]
    fn test_missing_column_fails() {
        assert!(parse_clusters_csv("file,cluster\na.txt,1\n").is_err());
    }

    #[test]
    fn test_bad_cluster_id_names_line() {
        let err = parse_clusters_csv("filename,cluster\na.txt,1\nb.txt,oops\n").unwrap_err();
        assert!(format!("{err:#}").contains("line 3"));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = read_clusters_csv(Path::new("/nonexistent/clusters.csv")).unwrap_err();
        assert!(err.to_string().contains("Clusters table not found"));
    }
}
