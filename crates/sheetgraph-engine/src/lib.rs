//! sheetgraph_engine - Positions, values and the arithmetic formula language.

pub mod engine;
