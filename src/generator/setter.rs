use super::fmt_error;
use crate::error::Result;
use crate::model::Struct;
use crate::utils::names::setter_param_name;
use std::fmt::Write as _;

/// func (u *User) SetName(value string) {
/// 	u.name = value
/// }
pub(super) fn write_setters(out: &mut String, s: &Struct) -> Result<()> {
    let receiver = s.receiver_type();
    let param = setter_param_name(&s.short_name);

    for field in s.private_fields_in_order() {
        if !field.will_generate_setter {
            continue;
        }
        writeln!(
            out,
            "func ({short} *{receiver}) {setter}({param} {ty}) {{\n\t{short}.{name} = {param}\n}}\n",
            short = s.short_name,
            receiver = receiver,
            setter = field.setter_name,
            param = param,
            ty = field.type_text,
            name = field.name,
        )
        .map_err(fmt_error)?;
    }

    Ok(())
}
