//! Factorial design helpers: grid expansion, replication and randomisation.

pub mod grid;
pub mod randomize;

pub use self::grid::{expand_grid, replicate, replicate_by, replicate_to, FactorSet, FactorTable};
pub use self::randomize::{
    assign_stratified, balanced_labels, permute, session_rng, shuffle_after_prefix,
    shuffle_within_blocks, BlockOrder,
};
