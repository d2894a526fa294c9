//! Queries over the type model of a .NET module
//!
//! Every query exists twice: as a method of [`Inspector`], working on an already loaded
//! [`CilModule`], and as a free function taking a path, which loads the module, runs the query
//! and drops the module again. A failed load is returned as an error; a query that finds
//! nothing returns `Ok(None)`.
//!
//! All queries narrate what they search for and what they found through the `log` facade at
//! `info` level.
//!
//! # Examples
//!
//! ```rust,no_run
//! use dotinspect::inspector;
//!
//! match inspector::largest_parameter_list_method("tests/samples/Sample.dll")? {
//!     Some(method) => println!("{} takes {} parameters", method, method.parameter_count),
//!     None => println!("no public instance method takes parameters"),
//! }
//! # Ok::<(), dotinspect::Error>(())
//! ```

mod descriptor;
mod enumerable;

pub use descriptor::{MethodDescriptor, TypeDescriptor};

use std::path::Path;

use crate::{
    metadata::{cilmodule::CilModule, signatures::TypeSignature},
    Result,
};

/// Characters that mark a lower-cased name as Spanish
const SPANISH_CHARACTERS: [char; 6] = ['á', 'é', 'í', 'ó', 'ú', 'ñ'];

/// Runs the queries against one loaded module
pub struct Inspector<'a> {
    module: &'a CilModule,
}

impl<'a> Inspector<'a> {
    /// Create an inspector over `module`
    #[must_use]
    pub fn new(module: &'a CilModule) -> Self {
        Inspector { module }
    }

    /// The public instance method with the most parameters
    ///
    /// Constructors and static methods are skipped. On a tie the method found first wins, and
    /// a method has to take at least one parameter to be returned.
    #[must_use]
    pub fn largest_parameter_list_method(&self) -> Option<MethodDescriptor> {
        let mut best: Option<MethodDescriptor> = None;
        let mut max_parameter_count = 0;

        for cil_type in self.module.types() {
            for method in &cil_type.methods {
                if !method.is_public() || method.is_static() || method.is_constructor() {
                    continue;
                }

                let parameter_count = method.param_count();
                if parameter_count > max_parameter_count {
                    max_parameter_count = parameter_count;
                    best = Some(MethodDescriptor::new(method, cil_type));
                }
            }
        }

        match &best {
            Some(method) => log::info!(
                "Method '{}' in class '{}' has the longest parameter list, {} parameters",
                method.name,
                method.declaring_type,
                method.parameter_count
            ),
            None => log::info!("No public instance method with parameters found in the module"),
        }

        best
    }

    /// The first method declaring both an `int` and a `bool` local variable
    ///
    /// Methods of any visibility are checked, static ones included. Types, methods and locals
    /// are scanned in declaration order.
    #[must_use]
    pub fn method_with_int_and_bool_locals(&self) -> Option<MethodDescriptor> {
        for cil_type in self.module.types() {
            for method in &cil_type.methods {
                if method.is_constructor() {
                    continue;
                }

                let mut has_int = false;
                let mut has_bool = false;
                for local in method.local_vars.iter().filter(|local| !local.is_byref) {
                    match local.base {
                        TypeSignature::I4 => has_int = true,
                        TypeSignature::Boolean => has_bool = true,
                        _ => {}
                    }

                    if has_int && has_bool {
                        log::info!(
                            "Method '{}' in class '{}' has local variables of type int and bool",
                            method.name,
                            cil_type.name
                        );
                        return Some(MethodDescriptor::new(method, cil_type));
                    }
                }
            }
        }

        log::info!("No method with local variables of type int and bool found in the module");
        None
    }

    /// The first type assignable to `System.Collections.IEnumerable`
    ///
    /// Interfaces and abstract types count.
    #[must_use]
    pub fn find_enumerable_type(&self) -> Option<TypeDescriptor> {
        let types = self.module.types();
        let Some(found) = types
            .iter()
            .find(|cil_type| enumerable::is_enumerable(types, cil_type))
        else {
            log::info!("No type implementing IEnumerable found in the module");
            return None;
        };

        log::info!("Type '{}' implements IEnumerable", found.name);

        let enclosing = found
            .enclosing_type
            .as_ref()
            .and_then(|token| self.module.type_by_token(token));
        Some(TypeDescriptor::new(found, enclosing))
    }

    /// The first public nested type whose name contains one of `á é í ó ú ñ`, in any case
    #[must_use]
    pub fn find_type_with_spanish_nested_type(&self) -> Option<TypeDescriptor> {
        for cil_type in self.module.types() {
            for nested_token in &cil_type.nested_types {
                let Some(nested) = self.module.type_by_token(nested_token) else {
                    continue;
                };

                if !nested.is_nested_public() {
                    continue;
                }

                if nested.name.to_lowercase().contains(SPANISH_CHARACTERS) {
                    log::info!(
                        "Class '{}' has a nested type '{}' with Spanish characters",
                        cil_type.name,
                        nested.name
                    );
                    return Some(TypeDescriptor::new(nested, Some(cil_type)));
                }
            }
        }

        log::info!("No type with a Spanish named nested type found in the module");
        None
    }
}

/// Load the module at `path` and return its public instance method with the most parameters
///
/// # Errors
/// Returns an error if the module cannot be loaded
pub fn largest_parameter_list_method(path: impl AsRef<Path>) -> Result<Option<MethodDescriptor>> {
    log::info!("Looking for the public instance method with the longest parameter list");
    let module = CilModule::from_file(path.as_ref())?;
    Ok(Inspector::new(&module).largest_parameter_list_method())
}

/// Load the module at `path` and return the first method with an `int` and a `bool` local
///
/// # Errors
/// Returns an error if the module cannot be loaded
pub fn method_with_int_and_bool_locals(path: impl AsRef<Path>) -> Result<Option<MethodDescriptor>> {
    log::info!("Looking for a method with local variables of type int and bool");
    let module = CilModule::from_file(path.as_ref())?;
    Ok(Inspector::new(&module).method_with_int_and_bool_locals())
}

/// Load the module at `path` and return the first type assignable to `IEnumerable`
///
/// # Errors
/// Returns an error if the module cannot be loaded
pub fn find_enumerable_type(path: impl AsRef<Path>) -> Result<Option<TypeDescriptor>> {
    log::info!("Looking for a type implementing IEnumerable");
    let module = CilModule::from_file(path.as_ref())?;
    Ok(Inspector::new(&module).find_enumerable_type())
}

/// Load the module at `path` and return the first public nested type with a Spanish name
///
/// # Errors
/// Returns an error if the module cannot be loaded
pub fn find_type_with_spanish_nested_type(
    path: impl AsRef<Path>,
) -> Result<Option<TypeDescriptor>> {
    log::info!("Looking for a type with a nested type named in Spanish");
    let module = CilModule::from_file(path.as_ref())?;
    Ok(Inspector::new(&module).find_type_with_spanish_nested_type())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{metadata::typesystem::ELEMENT_TYPE, test::ModuleBuilder};

    const I4: &[u8] = &[ELEMENT_TYPE::I4];
    const BOOLEAN: &[u8] = &[ELEMENT_TYPE::BOOLEAN];

    fn load(builder: ModuleBuilder) -> CilModule {
        CilModule::from_mem(builder.build()).unwrap()
    }

    #[test]
    fn largest_parameter_list() {
        let module = load(
            ModuleBuilder::new("Largest.dll")
                .class("Demo", "A", |t| {
                    t.method("M1", |m| m.param(I4).param(I4).param(I4))
                })
                .class("Demo", "B", |t| t.method("M2", |m| m.param(I4))),
        );

        let method = Inspector::new(&module)
            .largest_parameter_list_method()
            .unwrap();
        assert_eq!(method.name, "M1");
        assert_eq!(method.declaring_type, "A");
        assert_eq!(method.parameter_count, 3);
    }

    #[test]
    fn largest_parameter_list_filters() {
        let module = load(
            ModuleBuilder::new("Filters.dll").class("Demo", "A", |t| {
                t.method(".ctor", |m| m.constructor().param(I4).param(I4).param(I4).param(I4))
                    .method("Hidden", |m| m.private().param(I4).param(I4).param(I4))
                    .method("Shared", |m| m.set_static().param(I4).param(I4).param(I4))
                    .method("First", |m| m.param(I4).param(BOOLEAN))
                    .method("Second", |m| m.param(BOOLEAN).param(I4))
            }),
        );

        let method = Inspector::new(&module)
            .largest_parameter_list_method()
            .unwrap();
        assert_eq!(method.name, "First");
        assert_eq!(method.parameter_count, 2);
    }

    #[test]
    fn largest_parameter_list_absent() {
        let module = load(
            ModuleBuilder::new("Empty.dll")
                .class("Demo", "A", |t| t.method("Run", |m| m))
                .class("Demo", "B", |t| {
                    t.method("Helper", |m| m.set_static().param(I4))
                }),
        );

        assert!(Inspector::new(&module)
            .largest_parameter_list_method()
            .is_none());
    }

    #[test]
    fn int_and_bool_locals() {
        let module = load(
            ModuleBuilder::new("Locals.dll")
                .class("Demo", "A", |t| {
                    t.method("OnlyInt", |m| m.local(I4).local(I4))
                        .method("ByRef", |m| m.local(I4).byref_local(BOOLEAN))
                })
                .class("Demo", "B", |t| {
                    t.method("Check", |m| {
                        m.private()
                            .set_static()
                            .local(&[ELEMENT_TYPE::STRING])
                            .local(BOOLEAN)
                            .pinned_local(I4)
                    })
                    .method("Later", |m| m.local(I4).local(BOOLEAN))
                }),
        );

        let method = Inspector::new(&module)
            .method_with_int_and_bool_locals()
            .unwrap();
        assert_eq!(method.name, "Check");
        assert_eq!(method.declaring_type, "B");
    }

    #[test]
    fn int_and_bool_locals_absent() {
        let module = load(ModuleBuilder::new("NoLocals.dll").class("Demo", "A", |t| {
            t.method("Abstract", |m| m.no_body())
                .method("Counter", |m| m.local(I4).local(&[ELEMENT_TYPE::I8]))
        }));

        assert!(Inspector::new(&module)
            .method_with_int_and_bool_locals()
            .is_none());
    }

    #[test]
    fn enumerable_type() {
        let module = load(
            ModuleBuilder::new("Enumerable.dll")
                .class("Demo", "Plain", |t| t.method("Run", |m| m))
                .interface("Demo", "ISequence", |t| {
                    t.implements_generic("System.Collections.Generic", "IEnumerable`1")
                })
                .class("Demo", "Bag", |t| {
                    t.implements_external("System.Collections", "IEnumerable")
                }),
        );

        let found = Inspector::new(&module).find_enumerable_type().unwrap();
        assert_eq!(found.name, "ISequence");
        assert_eq!(found.namespace, "Demo");
        assert_eq!(found.enclosing_type, None);
    }

    #[test]
    fn enumerable_through_base_types() {
        let module = load(
            ModuleBuilder::new("Bases.dll")
                .class("Demo", "Plain", |t| t)
                .class("Demo", "Numbers", |t| {
                    t.extends_generic("System.Collections.Generic", "List`1")
                })
                .class("Demo", "Names", |t| {
                    t.extends_external("System.Collections", "ArrayList")
                }),
        );

        let found = Inspector::new(&module).find_enumerable_type().unwrap();
        assert_eq!(found.name, "Numbers");
    }

    #[test]
    fn enumerable_nested_type() {
        let module = load(
            ModuleBuilder::new("NestedBag.dll")
                .class("Demo", "Base", |t| {
                    t.implements_external("System.Collections", "IEnumerable")
                })
                .class("Demo", "Holder", |t| {
                    t.nested("Bag", |n| n.extends_local("Demo", "Base"))
                }),
        );

        let types = module.types();
        let base = types.get_by_fullname("Demo.Base")[0];
        let bag = types.iter().find(|t| t.name == "Bag").unwrap();
        assert!(super::enumerable::is_enumerable(types, base));
        assert!(super::enumerable::is_enumerable(types, bag));

        let found = Inspector::new(&module).find_enumerable_type().unwrap();
        assert_eq!(found.name, "Base");
        assert_eq!(found.enclosing_type, None);
    }

    #[test]
    fn enumerable_type_absent() {
        let module = load(
            ModuleBuilder::new("Plain.dll")
                .class("Demo", "Plain", |t| {
                    t.implements_external("System", "IDisposable")
                }),
        );

        assert!(Inspector::new(&module).find_enumerable_type().is_none());
    }

    #[test]
    fn spanish_nested_type() {
        let module = load(
            ModuleBuilder::new("Spanish.dll")
                .class("Demo", "Outer", |t| {
                    t.nested("Nino", |n| n).nested_private("Niño", |n| n)
                })
                .class("Demo", "Lista", |t| t.nested("Año", |n| n))
                .class("Demo", "Otra", |t| t.nested("NIÑO", |n| n)),
        );

        let found = Inspector::new(&module)
            .find_type_with_spanish_nested_type()
            .unwrap();
        assert_eq!(found.name, "Año");
        assert_eq!(found.enclosing_type.as_deref(), Some("Lista"));
    }

    #[test]
    fn spanish_nested_type_upper_case() {
        let module = load(
            ModuleBuilder::new("Upper.dll").class("Demo", "Otra", |t| t.nested("NIÑO", |n| n)),
        );

        let found = Inspector::new(&module)
            .find_type_with_spanish_nested_type()
            .unwrap();
        assert_eq!(found.name, "NIÑO");
        assert_eq!(found.to_string(), "Otra/NIÑO");
    }

    #[test]
    fn spanish_nested_type_absent() {
        let module = load(
            ModuleBuilder::new("Ascii.dll")
                .class("Demo", "Año", |t| t.nested("Nino", |n| n)),
        );

        assert!(Inspector::new(&module)
            .find_type_with_spanish_nested_type()
            .is_none());
    }

    #[test]
    fn large_heaps() {
        // more than 64 KiB of names and signatures switches to 4 byte heap indexes
        let mut builder = ModuleBuilder::new("Large.dll");
        for index in 0..3000_u32 {
            let name = format!("Generated{index:04}{}", "x".repeat(24));
            builder = builder.class("Demo.Generated", &name, |t| {
                t.method(&format!("Run{index}"), |mut m| {
                    for bit in 0..12 {
                        m = m.local(if (index >> bit) & 1 == 1 { I4 } else { BOOLEAN });
                    }
                    for _ in 0..12 {
                        m = m.local(&[ELEMENT_TYPE::I8]);
                    }
                    m
                })
            });
        }
        let module = load(
            builder.class("Demo", "Last", |t| t.method("Win", |m| m.param(I4).param(I4))),
        );
        assert_eq!(module.types().len(), 3001);

        let inspector = Inspector::new(&module);

        let largest = inspector.largest_parameter_list_method().unwrap();
        assert_eq!(largest.name, "Win");
        assert_eq!(largest.declaring_type, "Last");
        assert_eq!(largest.parameter_count, 2);

        let locals = inspector.method_with_int_and_bool_locals().unwrap();
        assert_eq!(locals.name, "Run1");
        assert_eq!(locals.declaring_type, format!("Generated0001{}", "x".repeat(24)));
    }

    #[test]
    fn model_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CilModule>();
        assert_send_sync::<MethodDescriptor>();
        assert_send_sync::<TypeDescriptor>();
    }
}
