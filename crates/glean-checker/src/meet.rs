//! The meet of two types: the most precise type both of them agree on. It's what narrowing a
//! parameter and checking an argument against a parameter come down to.

use crate::types::Type;

/// Returns `None` when the two types have nothing in common.
pub fn intersection(left: &Type, right: &Type) -> Option<Type> {
    if left == right {
        return Some(left.clone());
    }

    match (left, right) {
        (Type::Unknown | Type::Any, other) | (other, Type::Unknown | Type::Any) => {
            Some(other.clone())
        }

        (Type::List(l), Type::List(r)) => intersection(l, r).map(Type::list),
        (Type::Tuple(l), Type::Tuple(r)) => intersection(l, r).map(Type::tuple),
        (Type::Set(l), Type::Set(r)) => intersection(l, r).map(Type::set),

        (Type::Dict(lk, lv), Type::Dict(rk, rv)) => {
            let key = intersection(lk, rk)?;
            let value = intersection(lv, rv)?;
            Some(Type::dict(key, value))
        }

        _ => None,
    }
}

/// The meet of every type in `types`, starting from [Type::Unknown].
pub fn intersection_all<'a>(types: impl IntoIterator<Item = &'a Type>) -> Option<Type> {
    types
        .into_iter()
        .try_fold(Type::Unknown, |acc, typ| intersection(&acc, typ))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unknown_and_any_are_identities() {
        assert_eq!(intersection(&Type::Unknown, &Type::Num), Some(Type::Num));
        assert_eq!(intersection(&Type::Str, &Type::Any), Some(Type::Str));
        assert_eq!(intersection(&Type::Any, &Type::Unknown), Some(Type::Unknown));
    }

    #[test]
    fn containers_meet_element_wise() {
        let left = Type::dict(Type::Unknown, Type::list(Type::Num));
        let right = Type::dict(Type::Str, Type::list(Type::Unknown));

        assert_eq!(
            intersection(&left, &right),
            Some(Type::dict(Type::Str, Type::list(Type::Num)))
        );
    }

    #[test]
    fn meeting_many_types_stops_at_the_first_conflict() {
        assert_eq!(intersection_all(&[]), Some(Type::Unknown));
        assert_eq!(
            intersection_all(&[Type::Unknown, Type::Num, Type::Num]),
            Some(Type::Num)
        );
        assert_eq!(intersection_all(&[Type::Num, Type::Str, Type::Str]), None);
    }

    #[test]
    fn unrelated_types_do_not_meet() {
        assert_eq!(intersection(&Type::Num, &Type::Str), None);
        assert_eq!(intersection(&Type::list(Type::Num), &Type::set(Type::Num)), None);
        assert_eq!(intersection(&Type::Undefined, &Type::NoneType), None);
        assert_eq!(
            intersection(&Type::list(Type::Num), &Type::list(Type::Bool)),
            None
        );
    }
}
