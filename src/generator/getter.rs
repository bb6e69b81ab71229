use super::fmt_error;
use crate::error::Result;
use crate::model::Struct;
use std::fmt::Write as _;

/// func (u *User) Name() string {
/// 	return u.name
/// }
pub(super) fn write_getters(out: &mut String, s: &Struct) -> Result<()> {
    let receiver = s.receiver_type();

    for field in s.private_fields_in_order() {
        if !field.will_generate_getter {
            continue;
        }
        writeln!(
            out,
            "func ({short} *{receiver}) {getter}() {ty} {{\n\treturn {short}.{name}\n}}\n",
            short = s.short_name,
            receiver = receiver,
            getter = field.getter_name,
            ty = field.type_text,
            name = field.name,
        )
        .map_err(fmt_error)?;
    }

    Ok(())
}
