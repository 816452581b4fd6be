/// Construct a [`Document`](crate::Document) from a literal.
///
/// Values can be anything [`DocumentBuilder::append`](crate::DocumentBuilder::append) accepts,
/// or nested `{ ... }` documents and `[ ... ]` arrays, which are written in place through child
/// builders. Negative numbers and other multi-token expressions must be parenthesized.
///
/// ```
/// use bson_builder::doc;
///
/// let doc = doc! {
///     "name" => "x",
///     "n" => (-3),
///     "nested" => { "a" => 1, "b" => [true, "two", { "c" => 3.5 }] },
/// };
/// assert_eq!(doc.get_i32("n")?, -3);
/// assert_eq!(doc.get_document("nested")?.get_array("b")?.get_str(1)?, "two");
/// # Ok::<(), bson_builder::error::Error>(())
/// ```
///
/// # Panics
///
/// Panics if a key contains a nul byte or the document exceeds the default size limit.
#[macro_export]
macro_rules! doc {
    () => {{ $crate::Document::new() }};

    ( $($key:expr => $val:tt),* $(,)? ) => {{
        let mut builder = $crate::DocumentBuilder::new();

        $(
            $crate::doc_field!(builder, $key, $val);
        )*

        match builder.obj() {
            Ok(doc) => doc,
            Err(e) => panic!("invalid document literal: {}", e),
        }
    }};
}

/// Construct a BSON array, as a [`Document`](crate::Document) keyed by index, from a literal.
///
/// ```
/// use bson_builder::array;
///
/// let arr = array![1, "two", [3]];
/// assert_eq!(arr.get_str("1")?, "two");
/// # Ok::<(), bson_builder::error::Error>(())
/// ```
///
/// # Panics
///
/// Panics if the array exceeds the default size limit.
#[macro_export]
macro_rules! array {
    () => {{ $crate::Document::new() }};

    ( $($val:tt),* $(,)? ) => {{
        let mut builder = $crate::ArrayBuilder::new();

        $(
            $crate::array_value!(builder, $val);
        )*

        match builder.arr() {
            Ok(arr) => arr,
            Err(e) => panic!("invalid array literal: {}", e),
        }
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! doc_field {
    ($builder:ident, $key:expr, { $($k:expr => $v:tt),* $(,)? }) => {{
        #[allow(unused_mut)]
        let mut sub = $builder.subobj_start($key);
        $(
            $crate::doc_field!(sub, $k, $v);
        )*
        sub.done();
    }};

    ($builder:ident, $key:expr, [ $($v:tt),* $(,)? ]) => {{
        #[allow(unused_mut)]
        let mut sub = $builder.subarray_start($key);
        $(
            $crate::array_value!(sub, $v);
        )*
        sub.done();
    }};

    ($builder:ident, $key:expr, $val:expr) => {{
        $builder.append($key, $val);
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! array_value {
    ($builder:ident, { $($k:expr => $v:tt),* $(,)? }) => {{
        #[allow(unused_mut)]
        let mut sub = $builder.subobj_start();
        $(
            $crate::doc_field!(sub, $k, $v);
        )*
        sub.done();
    }};

    ($builder:ident, [ $($v:tt),* $(,)? ]) => {{
        #[allow(unused_mut)]
        let mut sub = $builder.subarray_start();
        $(
            $crate::array_value!(sub, $v);
        )*
        sub.done();
    }};

    ($builder:ident, $val:expr) => {{
        $builder.append($val);
    }};
}
