/// Appends items to a collection by value, for use in expression chains.
pub(crate) trait Merge<T> {
    fn merge_all( self, items: impl IntoIterator<Item = T> ) -> Self ;
}

impl<T> Merge<T> for Vec<T> {
    fn merge_all( mut self, items: impl IntoIterator<Item = T> ) -> Self {
        self.extend( items );
        self
    }
}
