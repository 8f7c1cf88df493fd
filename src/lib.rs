// stoprefine: iterative stopword refinement for clustered French text corpora
//
// This is the library root. The refinement core lives in `refine`; the other
// modules load its inputs, persist its outputs and talk to the terminal.

pub mod config;
pub mod corpus;
pub mod output;
pub mod refine;
pub mod status;
pub mod stopwords;
