#[macro_export]
macro_rules! pqueue {
    () => ({
        $crate::PriorityQueue::new()
    });
    ($($x:expr),*$(,)*) => ({
        let mut queue = $crate::PriorityQueue::new();
        $(queue.add($x);)*
        queue
    });
}

#[macro_export]
macro_rules! list {
    () => ({
        $crate::Value::List(Vec::new())
    });
    ($($x:expr),*$(,)*) => ({
        $crate::Value::List(vec![$($crate::Value::from($x)),*])
    });
}

#[macro_export]
macro_rules! seq {
    () => ({
        $crate::Value::Seq(Default::default())
    });
    ($($x:expr),*$(,)*) => ({
        $crate::Value::Seq(vec![$($crate::Value::from($x)),*].into_iter().collect())
    });
}

#[macro_export]
macro_rules! set {
    () => ({
        $crate::Value::Set(Default::default())
    });
    ($($x:expr),*$(,)*) => ({
        $crate::Value::Set(vec![$($crate::Value::from($x)),*].into_iter().collect())
    });
}

#[macro_export]
macro_rules! map {
    ($($key:expr => $value:expr,)+) => { $crate::map!($($key => $value),+) };
    ($($key:expr => $value:expr),*) => {
        {
            let entries: Vec<($crate::Value, $crate::Value)> = vec![
                $(($crate::Value::from($key), $crate::Value::from($value))),*
            ];
            $crate::Value::Map(entries.into_iter().collect())
        }
    };
}
