use std::hash::Hash ;
use nonempty_collections::NEMap ;

/// Collects entries into a non-empty map, or `None` if there are none.
pub(crate) fn non_empty_map<K: Eq + Hash, V>( entries: impl IntoIterator<Item = ( K, V )> ) -> Option<NEMap<K, V>> {
    let mut entries = entries.into_iter();
    let ( key, value ) = entries.next()?;
    let mut map = NEMap::new( key, value );
    entries.for_each(|( key, value )| { map.insert( key, value ); });
    Some( map )
}
