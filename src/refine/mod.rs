// Stopword refinement — tokenize, aggregate per cluster, promote, repeat.

pub mod aggregate;
pub mod iteration;
pub mod promote;
pub mod tokenizer;
