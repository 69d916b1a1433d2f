//! Unit tests mirroring the `src/` tree, one file per source file

mod canvas;
mod filters;
mod io;
