use crate::model::Catalog;

/// IO requested by [`crate::update`], executed by the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadResults,
    LoadCatalog,
    /// Full-overwrite persist of a candidate catalog. The state commits the
    /// candidate only when the matching save confirmation arrives.
    SaveCatalog { catalog: Catalog },
    StartCrawl { keywords: Vec<String> },
    DeleteRecord { landing_page: String },
    ExpandCategory { category: String },
}
