/// Statement part currently being written.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment {
    #[default]
    None,
    SqlCreateTable,
    SqlCreateTableForeignKey,
    SqlDeleteFrom,
    SqlDeleteFromWhere,
    SqlDropTable,
    SqlInsertInto,
    SqlInsertIntoValues,
    SqlSelectFrom,
    SqlSelectWhere,
    SqlUpdate,
    SqlUpdateSet,
    SqlUpdateWhere,
}

impl Fragment {
    /// Fragments where a NULL value compares with `IS NULL` instead of being bound.
    pub fn is_condition(&self) -> bool {
        matches!(
            self,
            Fragment::SqlSelectWhere | Fragment::SqlUpdateWhere | Fragment::SqlDeleteFromWhere
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    pub fragment: Fragment,
}

impl Context {
    pub fn new(fragment: Fragment) -> Self {
        Self { fragment }
    }

    /// Context for a nested fragment of the statement being written.
    pub fn switch_fragment(&self, fragment: Fragment) -> Context {
        Context { fragment, ..*self }
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::new(Fragment::None)
    }
}
