use std::path::PathBuf;

xflags::xflags! {
    /// Render every article below <input> into layout fragments below <output>.
    ///
    /// Fragments that already exist are left untouched.
    cmd quire {
        /// Directory whose subdirectories are articles.
        required input: PathBuf
        /// Directory receiving one subdirectory of fragments per article.
        required output: PathBuf
        /// Settings file. Defaults to `<input>/leaflet.toml` when present.
        optional -c, --config path: PathBuf
        /// Log progress at `info` level regardless of `RUST_LOG`.
        optional -v, --verbose
    }
}
