//! IR type formatting for diagnostics and trace output.

#![allow(clippy::format_push_string)] // Diagnostics prioritize clarity over allocation

use kiln_stack::ensure_sufficient_stack;

use crate::data::{AddressSpace, IrTypeData};
use crate::hints::{AlignmentKind, LayoutHint, RefTypeHint};
use crate::{IrContext, IrType};

impl IrContext {
    /// Format a type as a human-readable string.
    pub fn format_type(&self, ty: IrType) -> String {
        let mut buf = String::new();
        self.format_type_into(ty, &mut buf);
        buf
    }

    /// Format a type into an existing string buffer.
    pub fn format_type_into(&self, ty: IrType, buf: &mut String) {
        ensure_sufficient_stack(|| self.format_nested(ty, buf));
    }

    fn format_nested(&self, ty: IrType, buf: &mut String) {
        if let Some(name) = ty.primitive_name() {
            buf.push_str(name);
            return;
        }
        let Some(data) = self.table().get(ty) else {
            buf.push_str("<unknown>");
            return;
        };
        match data {
            IrTypeData::Pointer { pointee, space } => {
                self.format_type_into(pointee, buf);
                if space != AddressSpace::Generic {
                    buf.push_str(&format!(" addrspace({space})"));
                }
                buf.push('*');
            }
            IrTypeData::Array { element, len } => {
                buf.push_str(&format!("[{len} x "));
                self.format_type_into(element, buf);
                buf.push(']');
            }
            IrTypeData::Aggregate(agg) => {
                if agg.layout == LayoutHint::Packed {
                    buf.push_str("packed ");
                }
                buf.push_str(agg.kind.as_str());
                if let AlignmentKind::Explicit(align) = agg.alignment {
                    buf.push_str(&format!(" align({align})"));
                }
                match agg.ref_hint {
                    RefTypeHint::Default => {}
                    RefTypeHint::ByValue => buf.push_str(" byval"),
                    RefTypeHint::ByReference => buf.push_str(" byref"),
                }
                if agg.fields.is_empty() {
                    buf.push_str(" {}");
                    return;
                }
                buf.push_str(" { ");
                for (i, field) in agg.fields.iter().enumerate() {
                    if i > 0 {
                        buf.push_str(", ");
                    }
                    buf.push_str(&field.name);
                    buf.push_str(": ");
                    self.format_type_into(field.ty, buf);
                }
                buf.push_str(" }");
            }
            // Primitives were handled by their fixed names above.
            _ => buf.push_str("<primitive>"),
        }
    }
}
