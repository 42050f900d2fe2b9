/// checks the laws every equality strategy must obey, for a strategy expression and a value type
macro_rules! equality_laws {
    ($strategy:expr, $test:ty) => {
        #[quickcheck]
        fn equality_reflexive(a: $test) -> bool {
            let s = $strategy;
            !$crate::Equality::<$test>::is_valid_key(&s, &a)
                || $crate::Equality::<$test>::equals(&s, &a, &a)
        }

        #[quickcheck]
        fn equality_symmetric(a: $test, b: $test) -> bool {
            let s = $strategy;
            $crate::Equality::<$test>::equals(&s, &a, &b)
                == $crate::Equality::<$test>::equals(&s, &b, &a)
        }

        #[quickcheck]
        fn hash_consistent(a: $test, b: $test) -> bool {
            let s = $strategy;
            !$crate::Equality::<$test>::equals(&s, &a, &b)
                || $crate::Equality::<$test>::hash(&s, &a) == $crate::Equality::<$test>::hash(&s, &b)
        }

        #[quickcheck]
        fn hash_consistent_with_clone(a: $test) -> bool {
            let s = $strategy;
            let b = a.clone();
            !$crate::Equality::<$test>::is_valid_key(&s, &a)
                || ($crate::Equality::<$test>::equals(&s, &a, &b)
                    && $crate::Equality::<$test>::hash(&s, &a)
                        == $crate::Equality::<$test>::hash(&s, &b))
        }
    };
}
