use std::sync::Arc;

type Getter<S, T> = Arc<dyn Fn(&S) -> T + Send + Sync>;
type Setter<S, T> = Arc<dyn Fn(S, T) -> S + Send + Sync>;

/// A getter/setter pair focusing on a part `T` of a value `S`.
///
/// Setting returns an updated copy of `S`; with persistent containers only
/// the focused path is copied.
pub struct Lens<S, T> {
    get: Getter<S, T>,
    set: Setter<S, T>,
}

impl<S, T> Clone for Lens<S, T> {
    fn clone(&self) -> Self {
        Self {
            get: Arc::clone(&self.get),
            set: Arc::clone(&self.set),
        }
    }
}

impl<S: 'static, T: 'static> Lens<S, T> {
    pub fn new(
        get: impl Fn(&S) -> T + Send + Sync + 'static,
        set: impl Fn(S, T) -> S + Send + Sync + 'static,
    ) -> Self {
        Self {
            get: Arc::new(get),
            set: Arc::new(set),
        }
    }

    pub fn get(&self, whole: &S) -> T {
        (self.get)(whole)
    }

    pub fn set(&self, whole: S, part: T) -> S {
        (self.set)(whole, part)
    }

    /// Replaces the focused part with `f` applied to it.
    pub fn over(&self, whole: S, f: impl FnOnce(T) -> T) -> S {
        let part = self.get(&whole);
        self.set(whole, f(part))
    }

    /// Focuses further into the part with `inner`.
    pub fn then<U: 'static>(&self, inner: Lens<T, U>) -> Lens<S, U> {
        let (outer_get, outer) = (self.clone(), self.clone());
        let inner_get = inner.clone();
        Lens::new(
            move |whole: &S| inner_get.get(&outer_get.get(whole)),
            move |whole: S, leaf: U| {
                let part = outer.get(&whole);
                outer.set(whole, inner.set(part, leaf))
            },
        )
    }
}

/// Builds a [`Lens`] over a (possibly nested) field path of a struct.
///
/// ```
/// # use bulin::lens;
/// #[derive(Clone)]
/// struct Point { x: f32, y: f32 }
/// let x = lens!(Point, x);
/// let moved = x.set(Point { x: 1.0, y: 2.0 }, 5.0);
/// assert_eq!((moved.x, moved.y), (5.0, 2.0));
/// ```
#[macro_export]
macro_rules! lens {
    ($ty:ty, $($field:ident).+) => {
        $crate::cursor::Lens::new(
            |whole: &$ty| whole.$($field).+.clone(),
            |mut whole: $ty, part| {
                whole.$($field).+ = part;
                whole
            },
        )
    };
}

#[cfg(test)]
mod tests {

    #[derive(Debug, Clone, PartialEq)]
    struct Inner {
        value: i32,
        label: String,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Outer {
        inner: Inner,
        flag: bool,
    }

    fn sample() -> Outer {
        Outer {
            inner: Inner {
                value: 1,
                label: "one".into(),
            },
            flag: true,
        }
    }

    #[test]
    fn field_lens_gets_and_sets() {
        let flag = lens!(Outer, flag);
        assert!(flag.get(&sample()));
        assert!(!flag.set(sample(), false).flag);
    }

    #[test]
    fn nested_path_and_composition_agree() {
        let direct = lens!(Outer, inner.value);
        let composed = lens!(Outer, inner).then(lens!(Inner, value));

        assert_eq!(direct.get(&sample()), composed.get(&sample()));
        assert_eq!(direct.set(sample(), 9), composed.set(sample(), 9));
        assert_eq!(composed.set(sample(), 9).inner.label, "one");
    }

    #[test]
    fn over_applies_function_to_focus() {
        let value = lens!(Outer, inner.value);
        assert_eq!(value.over(sample(), |v| v * 10).inner.value, 10);
    }
}
