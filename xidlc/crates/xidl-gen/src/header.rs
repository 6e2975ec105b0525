//! C++ binding-header generation.
//!
//! The generator replays the hint stream left to right. Types land in two
//! passes: first every declaration in hint order, then the inline method
//! thunks of the interfaces, once every referenced type is in scope. The
//! companion tie header carries the `Tie` templates that let an
//! implementation class populate an interface vtbl.

use xidl_meta::{Guid, Hint, HintKind, Member, Method, Repository, TypeDesc, TypeId};
use xidl_util::{base_part, Error, Result};

use crate::helper::{cpp_name, replace_idl_extension};
use crate::indent::IndentedOutput;
use crate::rules::RuleBase;
use crate::tmpl::TextTmpl;

const ENUM_TMPL: &str = "namespace @enumName@\n\
{\t\n\
enum type\n\
{\t\n\
@elements@\x0B\n\
};\x0B\n\
}\n\
typedef @enumName@::type @enumName@Enum;\n";

const ARRAY_TMPL: &str = "class @arrayName@\n\
 : public xcom::@simple@ArrayBase<@typename@, @size@, @rawtypename@>\n\
{\t\n\
@adopt@\x0B\n\
};\n";

const ARRAY_ADOPT_TMPL: &str = "static @arrayName@ adopt(RawType const& src)\n\
{\t\n\
@arrayName@ result;\n\
::memcpy(&result, &src, sizeof(RawType));\n\
return result;\x0B\n\
}\n";

const SEQUENCE_TMPL: &str = "class @seqName@ : public xcom::SequenceBase<@typename@, @rawTypeName@>\n\
{\n\
public:\t\n\
@adopt@\n\
\n\
@seqName@() {}\n\
explicit @seqName@(xcom::Int size)\n\
: xcom::SequenceBase<@typename@, @rawTypeName@>(size)\n\
{\n\
}\x0B\n\
};\n";

const SEQUENCE_ADOPT_TMPL: &str = "static @typeName@ adopt(RawType const& src)\n\
{\t\n\
@typeName@ result;\n\
::memcpy(&result, &src, sizeof(RawType));\n\
return result;\x0B\n\
}";

const RAW_STRUCT_TMPL: &str = "@guidguardbegin@\n\
struct @structname@\n\
{\t\n\
@members@\x0B\n\
};\n\
@guidguardend@\n";

const DETACH_LINE_TMPL: &str = "result.@memberName@ = @srcMemberName@@detachCall@;";

const DETACH_TMPL: &str = "RawType detach()\n\
{\t\n\
RawType result;\n\
\n\
@assignments@\n\
\n\
return result;\x0B\n\
};\n";

const ADOPT_TMPL: &str = "static @structname@ adopt(RawType const& raw)\n\
{\t\n\
@structname@ result;\n\
::memcpy(&result, &raw, sizeof(RawType));\n\
return result;\x0B\n\
}\n";

const STRUCT_TMPL: &str = "struct @structname@\n\
{\t\n\
@members@\n\
typedef @structname@Data RawType;\n\
@detach@\n\
@adopt@\x0B\n\
};\n";

const PLAIN_STRUCT_TMPL: &str = "struct @structname@\n\
{\t\n\
@members@\n\
typedef @structname@ RawType;\x0B\n\
};\n";

const EXCEPTION_TMPL: &str = "struct @excname@ : public @base@\n\
{\t\n\
@members@\x0B\n\
};\n";

/// Look a hint parameter up; the parser guarantees it resolves.
fn hint_type(repo: &Repository, hint: &Hint) -> Result<TypeId> {
    repo.find(&hint.parameter)
        .ok_or_else(|| Error::internal(format!("hint names unknown type: {}", hint.parameter)))
}

/// Member lines of a struct-like type, owning or raw form.
fn struct_member_lines(
    repo: &Repository,
    rules: &mut RuleBase,
    members: &[Member],
    raw: bool,
) -> String {
    let mut lines = Vec::new();
    for member in members {
        let member_rules = rules.for_type(repo, member.ty);
        let ty = if raw {
            member_rules.raw_type()
        } else {
            member_rules.normal_type()
        };
        lines.push(format!("{ty} {};", member.name));
    }
    lines.join("\n")
}

fn gen_enum(def: &xidl_meta::EnumDef) -> Result<String> {
    let base = base_part(&def.name);
    TextTmpl::new(ENUM_TMPL, 4)
        .add_param(base)
        .add_param(def.elements.join(",\n"))
        .add_param(base)
        .add_param(base)
        .render()
}

fn gen_array(repo: &Repository, rules: &mut RuleBase, def: &xidl_meta::ArrayDef) -> Result<String> {
    let base = base_part(&def.name);
    let complex = rules.is_complex(repo, def.element);

    let adopt = if complex {
        TextTmpl::new(ARRAY_ADOPT_TMPL, 4)
            .add_param(base)
            .add_param(base)
            .render()?
    } else {
        String::new()
    };

    let element_rules = rules.for_type(repo, def.element);
    let mut tmpl = TextTmpl::new(ARRAY_TMPL, 4).add_param(base);
    tmpl = if complex {
        tmpl.skip_param()
    } else {
        tmpl.add_param("Simple")
    };
    tmpl.add_param(element_rules.normal_type())
        .add_param(def.size.to_string())
        .add_param(element_rules.raw_type())
        .add_param(adopt)
        .render()
}

fn gen_sequence(
    repo: &Repository,
    rules: &mut RuleBase,
    def: &xidl_meta::SequenceDef,
) -> Result<String> {
    let base = base_part(&def.name);
    let adopt = TextTmpl::new(SEQUENCE_ADOPT_TMPL, 4)
        .add_param(base)
        .add_param(base)
        .render()?;

    let element_rules = rules.for_type(repo, def.element);
    TextTmpl::new(SEQUENCE_TMPL, 4)
        .add_param(base)
        .add_param(element_rules.normal_type())
        .add_param(element_rules.raw_type())
        .add_param(adopt)
        .add_param(base)
        .add_param(base)
        .add_param(element_rules.normal_type())
        .add_param(element_rules.raw_type())
        .render()
}

fn gen_struct_like(
    repo: &Repository,
    rules: &mut RuleBase,
    id: TypeId,
    name: &str,
    members: &[Member],
) -> Result<String> {
    let base = base_part(name);

    if !rules.is_complex(repo, id) {
        return TextTmpl::new(PLAIN_STRUCT_TMPL, 4)
            .add_param(base)
            .add_param(struct_member_lines(repo, rules, members, false))
            .add_param(base)
            .render();
    }

    let mut raw_tmpl = TextTmpl::new(RAW_STRUCT_TMPL, 4);
    // The GUID layout must agree with the runtime's own definition.
    raw_tmpl = if name == "xcom.GUID" {
        raw_tmpl.add_param("#ifndef XCOM_GUID_DEFINED\n#define XCOM_GUID_DEFINED")
    } else {
        raw_tmpl.skip_param()
    };
    let raw_struct = raw_tmpl
        .add_param(format!("{base}Data"))
        .add_param(struct_member_lines(repo, rules, members, true))
        .add_param(if name == "xcom.GUID" { "#endif" } else { "" })
        .render()?;

    let mut assignments = Vec::new();
    for member in members {
        let call = if rules.is_complex(repo, member.ty) {
            ".detach()"
        } else {
            ""
        };
        assignments.push(
            TextTmpl::new(DETACH_LINE_TMPL, 4)
                .add_param(&member.name)
                .add_param(&member.name)
                .add_param(call)
                .render()?,
        );
    }

    let detach = TextTmpl::new(DETACH_TMPL, 4)
        .add_param(assignments.join("\n"))
        .render()?;
    let adopt = TextTmpl::new(ADOPT_TMPL, 4)
        .add_param(base)
        .add_param(base)
        .render()?;

    let owning = TextTmpl::new(STRUCT_TMPL, 4)
        .add_param(base)
        .add_param(struct_member_lines(repo, rules, members, false))
        .add_param(base)
        .add_param(detach)
        .add_param(adopt)
        .render()?;

    Ok(format!("{raw_struct}\n{owning}"))
}

fn gen_exception(
    repo: &Repository,
    rules: &mut RuleBase,
    def: &xidl_meta::ExceptionDef,
) -> Result<String> {
    let base_class = match def.base {
        Some(base_id) => match repo.get(base_id) {
            TypeDesc::Exception(base_def) => cpp_name(&base_def.name),
            _ => return Err(Error::internal("exception base is not an exception")),
        },
        None => "xcom::UserExc".to_owned(),
    };

    TextTmpl::new(EXCEPTION_TMPL, 4)
        .add_param(base_part(&def.name))
        .add_param(base_class)
        .add_param(struct_member_lines(repo, rules, &def.members, false))
        .render()
}

/// Joined `make_param` renderings of a signature's real arguments.
fn owning_params(repo: &Repository, rules: &mut RuleBase, params: &[xidl_meta::Param]) -> String {
    params
        .iter()
        .map(|p| rules.for_type(repo, p.ty).make_param(p.mode, &p.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `, raw-param` suffix appended after the environment argument.
fn raw_param_suffix(repo: &Repository, rules: &mut RuleBase, params: &[xidl_meta::Param]) -> String {
    params
        .iter()
        .map(|p| {
            format!(
                ", {}",
                rules.for_type(repo, p.ty).make_raw_param(p.mode, &p.name)
            )
        })
        .collect()
}

/// `, raw-argument` suffix used when forwarding an owning call.
fn raw_arg_suffix(repo: &Repository, rules: &mut RuleBase, params: &[xidl_meta::Param]) -> String {
    params
        .iter()
        .map(|p| {
            format!(
                ", {}",
                rules.for_type(repo, p.ty).as_raw_param(p.mode, &p.name)
            )
        })
        .collect()
}

/// Joined `as_param` conversions used by the tie thunks.
fn owning_args(repo: &Repository, rules: &mut RuleBase, params: &[xidl_meta::Param]) -> String {
    params
        .iter()
        .map(|p| rules.for_type(repo, p.ty).as_param(p.mode, &p.name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn gen_delegate(
    repo: &Repository,
    rules: &mut RuleBase,
    def: &xidl_meta::DelegateDef,
) -> Result<String> {
    let base = base_part(&def.name);
    let ret = def.return_param();
    let raw_ret = rules.for_type(repo, ret.ty).raw_return_type().to_owned();
    let normal_ret = rules.for_type(repo, ret.ty).return_type().to_owned();
    let params = owning_params(repo, rules, def.args());
    let raw_params = raw_param_suffix(repo, rules, def.args());
    let raw_args = raw_arg_suffix(repo, rules, def.args());

    let ret_is_void = normal_ret == "void";
    let call =
        format!("raw_.func(raw_.context, &__exc_info{raw_args})");
    let invoke = if ret_is_void {
        format!("{call};\nif(__exc_info.exception) xcomFindAndThrow(&__exc_info);")
    } else if rules.is_complex(repo, ret.ty) {
        format!(
            "{normal_ret} result({normal_ret}::adopt({call}));\n\
             if(__exc_info.exception) xcomFindAndThrow(&__exc_info);\n\
             return result;"
        )
    } else {
        format!(
            "{normal_ret} result({call});\n\
             if(__exc_info.exception) xcomFindAndThrow(&__exc_info);\n\
             return result;"
        )
    };

    let mut out = String::new();
    out.push_str(&format!(
        "struct {base}Raw\n\
         {{\n\
         \x20   void* context;\n\
         \x20   {raw_ret} (*func)(void*, xcom::Environment*{raw_params});\n\
         }};\n\n"
    ));
    out.push_str(&format!(
        "class {base}\n\
         {{\n\
         public:\n\
         \x20   typedef {base}Raw RawType;\n\n\
         \x20   {base}() {{ raw_.context = 0; raw_.func = 0; }}\n\
         \x20   explicit {base}(RawType const& raw) : raw_(raw) {{}}\n\n"
    ));

    let mut body = IndentedOutput::new(&mut out, 4);
    body.inc();
    body.write_line(&format!("{normal_ret} operator()({params}) const"));
    body.write_line("{");
    body.inc();
    body.write_line("xcom::Environment __exc_info;");
    body.write_line(&invoke);
    body.dec();
    body.write_line("}");
    body.write_line("");
    body.write_line("RawType detach()");
    body.write_line("{");
    body.inc();
    body.write_line("RawType result(raw_);");
    body.write_line("raw_.context = 0;");
    body.write_line("raw_.func = 0;");
    body.write_line("return result;");
    body.dec();
    body.write_line("}");
    body.write_line("");
    body.write_line(&format!("static {base} adopt(RawType const& src)"));
    body.write_line("{");
    body.inc();
    body.write_line(&format!("return {base}(src);"));
    body.dec();
    body.write_line("}");
    body.dec();
    out.push_str("\nprivate:\n    RawType raw_;\n};\n");

    Ok(out)
}

/// `{ d1, d2, d3, { b, ... } }` initializer matching the runtime's GUID
/// layout; the first three fields print as signed decimals.
fn guid_initializer(guid: &Guid) -> String {
    let bytes: Vec<String> = guid.data4.iter().map(|b| format!("0x{b:02x}")).collect();
    format!(
        "{{\n    {}, {}, {},\n    {{{}}}\n}}",
        guid.data1 as i32,
        guid.data2 as i16,
        guid.data3 as i16,
        bytes.join(", ")
    )
}

/// Interface chain from the root down to `id`.
fn interface_chain(repo: &Repository, id: TypeId) -> Vec<TypeId> {
    let mut chain = Vec::new();
    let mut current = Some(id);
    while let Some(item) = current {
        match repo.get(item) {
            TypeDesc::Interface(def) => {
                chain.push(item);
                current = def.base;
            }
            _ => break,
        }
    }
    chain.reverse();
    chain
}

/// All methods of an interface including its inherited ones, root first.
/// This is the vtbl layout.
fn collect_methods(repo: &Repository, id: TypeId) -> Vec<Method> {
    let mut methods = Vec::new();
    for item in interface_chain(repo, id) {
        if let TypeDesc::Interface(def) = repo.get(item) {
            methods.extend(def.methods.iter().cloned());
        }
    }
    methods
}

fn gen_interface(
    repo: &Repository,
    rules: &mut RuleBase,
    id: TypeId,
    def: &xidl_meta::InterfaceDef,
) -> Result<String> {
    let base = base_part(&def.name).to_owned();
    let parent = def.base.map(|base_id| match repo.get(base_id) {
        TypeDesc::Interface(parent_def) => cpp_name(&parent_def.name),
        _ => String::new(),
    });

    let mut out = String::new();

    // Raw struct: empty derived layout, or the vptr holder at the root.
    match &parent {
        Some(parent_name) => out.push_str(&format!(
            "struct {base}Raw : public {parent_name}Raw\n{{\n}};\n"
        )),
        None => out.push_str(&format!("struct {base}Raw\n{{\n    void* vptr_;\n}};\n")),
    }

    // Vtbl struct with the flattened method chain.
    out.push_str(&format!("struct {base}Vtbl\n{{\n"));
    for method in collect_methods(repo, id) {
        let ret = method.return_param();
        let raw_ret = rules.for_type(repo, ret.ty).raw_return_type().to_owned();
        let raw_params = raw_param_suffix(repo, rules, method.args());
        out.push_str(&format!(
            "    {raw_ret} (*{})(void*, xcom::Environment*{raw_params});\n",
            method.name
        ));
    }
    out.push_str("};\n");

    // Owning wrapper class.
    match &parent {
        Some(parent_name) => {
            out.push_str(&format!("class {base} : public {parent_name}\n{{\npublic:\n"));
            out.push_str(&format!("    typedef {base}Raw* RawType;\n"));
            out.push_str(&format!("    typedef {parent_name} ParentClass;\n"));
            out.push_str(&format!("    {base}() {{}}\n"));
            out.push_str(&format!(
                "    {base}({base}Raw* ptr) : {parent_name}(({parent_name}Raw*)ptr) {{}}\n"
            ));
        }
        None => {
            out.push_str(&format!("class {base}\n{{\npublic:\n"));
            out.push_str(&format!("    typedef {base}Raw* RawType;\n"));
            out.push_str(&format!("    {base}() : ptr_(0) {{}}\n"));
            out.push_str(&format!("    {base}({base}Raw* ptr) : ptr_(ptr) {{}}\n"));
        }
    }

    for method in &def.methods {
        let ret = method.return_param();
        let normal_ret = rules.for_type(repo, ret.ty).return_type().to_owned();
        let params = owning_params(repo, rules, method.args());
        out.push_str(&format!("    {normal_ret} {}({params}) const;\n", method.name));
    }

    out.push_str(&format!(
        "    static {base} adopt({base}Raw* src)\n\
         \x20   {{\n\
         \x20       return {base}(src);\n\
         \x20   }}\n"
    ));
    out.push_str(&format!(
        "    {base}Raw* detach()\n\
         \x20   {{\n\
         \x20       {base}Raw* result = ({base}Raw*)ptr_;\n\
         \x20       ptr_ = 0;\n\
         \x20       return result;\n\
         \x20   }}\n"
    ));
    out.push_str(&format!(
        "    static inline xcom::GUID const& thisInterfaceId()\n\
         \x20   {{\n\
         \x20       static const xcom::GUID id =\n\
         \x20       {};\n\n\
         \x20       return id;\n\
         \x20   }}\n",
        guid_initializer(&def.iid).replace('\n', "\n        ")
    ));

    if parent.is_none() {
        out.push_str("\n    void* ptr_;\n");
    }
    out.push_str("};\n");

    Ok(out)
}

/// Inline out-of-class method bodies thunking through the vtbl.
fn gen_interface_methods(
    repo: &Repository,
    rules: &mut RuleBase,
    def: &xidl_meta::InterfaceDef,
) -> Result<String> {
    let cls = base_part(&def.name);
    let mut out = String::new();

    for method in &def.methods {
        let ret = method.return_param();
        let normal_ret = rules.for_type(repo, ret.ty).return_type().to_owned();
        let params = owning_params(repo, rules, method.args());
        let raw_args = raw_arg_suffix(repo, rules, method.args());
        let call = format!(
            "static_cast<{cls}Vtbl*>(static_cast<{cls}Raw*>(ptr_)->vptr_)->{}(ptr_, &__exc_info{raw_args})",
            method.name
        );

        out.push_str(&format!(
            "inline {normal_ret} {cls}::{}({params}) const\n{{\n",
            method.name
        ));
        out.push_str("    xcom::Environment __exc_info;\n");
        if normal_ret == "void" {
            out.push_str(&format!("    {call};\n"));
            out.push_str("    if(__exc_info.exception) xcomFindAndThrow(&__exc_info);\n");
        } else if rules.is_complex(repo, ret.ty) {
            out.push_str(&format!(
                "    {normal_ret} result({normal_ret}::adopt({call}));\n"
            ));
            out.push_str("    if(__exc_info.exception) xcomFindAndThrow(&__exc_info);\n");
            out.push_str("    return result;\n");
        } else {
            out.push_str(&format!("    {normal_ret} result({call});\n"));
            out.push_str("    if(__exc_info.exception) xcomFindAndThrow(&__exc_info);\n");
            out.push_str("    return result;\n");
        }
        out.push_str("}\n\n");
    }

    Ok(out)
}

/// The `Tie` template binding an implementation class into the vtbl.
fn gen_interface_tie(
    repo: &Repository,
    rules: &mut RuleBase,
    id: TypeId,
    def: &xidl_meta::InterfaceDef,
) -> Result<String> {
    let cls = base_part(&def.name);
    let methods = collect_methods(repo, id);
    let mut out = String::new();

    out.push_str(&format!(
        "template <class Impl>\nclass {cls}Tie : public {cls}Raw\n{{\npublic:\n"
    ));

    for method in &methods {
        let ret = method.return_param();
        let raw_ret = rules.for_type(repo, ret.ty).raw_return_type().to_owned();
        let normal_ret = rules.for_type(repo, ret.ty).return_type().to_owned();
        let name = &method.name;

        // The runtime answers the interface-id query itself.
        if name == "getInterfaceId" {
            out.push_str(&format!(
                "    static {raw_ret} {name}__call(void*, ::xcom::Environment*)\n\
                 \x20   {{\n\
                 \x20       return {cls}::thisInterfaceId();\n\
                 \x20   }}\n\n"
            ));
            continue;
        }

        let raw_params = raw_param_suffix(repo, rules, method.args());
        let args = owning_args(repo, rules, method.args());
        let impl_call =
            format!("static_cast<Impl*>(static_cast<{cls}Tie<Impl>*>(ptr))->{name}({args})");

        out.push_str(&format!(
            "    static {raw_ret} {name}__call(void* ptr, ::xcom::Environment* __exc_info{raw_params})\n\
             \x20   {{\n\
             \x20       try {{\n"
        ));
        if normal_ret == "void" {
            out.push_str(&format!("        {impl_call};\n"));
            out.push_str("        } catch(xcom::UserExc& ue) { ue.detach(__exc_info); }\n");
        } else if rules.is_complex(repo, ret.ty) {
            out.push_str(&format!("        return {impl_call}.detach();\n"));
            out.push_str("        } catch(xcom::UserExc& ue) { ue.detach(__exc_info); }\n");
            out.push_str(&format!("        return {normal_ret}().detach();\n"));
        } else {
            out.push_str(&format!("        return {impl_call};\n"));
            out.push_str("        } catch(xcom::UserExc& ue) { ue.detach(__exc_info); }\n");
            out.push_str(&format!("        return {normal_ret}();\n"));
        }
        out.push_str("    }\n\n");
    }

    out.push_str(&format!(
        "    {cls}Tie()\n\
         \x20   {{\n\
         \x20       vptr_ = &{cls}TieVtbl;\n\
         \x20   }}\n\n\
         private:\n\
         \x20   static {cls}Vtbl {cls}TieVtbl;\n\
         }};\n\n"
    ));

    out.push_str(&format!(
        "template <class Impl>\n{cls}Vtbl {cls}Tie<Impl>::{cls}TieVtbl =\n{{\n"
    ));
    for method in &methods {
        out.push_str(&format!("    &{cls}Tie<Impl>::{}__call,\n", method.name));
    }
    out.push_str("};\n");

    Ok(out)
}

fn gen_forward(repo: &Repository, hint: &Hint) -> Result<String> {
    let id = hint_type(repo, hint)?;
    let desc = repo.get(id);
    let name = desc.name().unwrap_or(&hint.parameter);
    let base = base_part(name);

    Ok(match desc {
        TypeDesc::Interface(_) => format!("struct {base}Raw;\nclass {base};"),
        _ => format!("struct {base};"),
    })
}

fn gen_type(repo: &Repository, rules: &mut RuleBase, id: TypeId) -> Result<String> {
    match repo.get(id) {
        TypeDesc::Enum(def) => gen_enum(def),
        TypeDesc::Array(def) => gen_array(repo, rules, def),
        TypeDesc::Sequence(def) => gen_sequence(repo, rules, def),
        TypeDesc::Struct(def) => gen_struct_like(repo, rules, id, &def.name, &def.members),
        TypeDesc::Exception(def) => gen_exception(repo, rules, def),
        TypeDesc::Interface(def) => gen_interface(repo, rules, id, def),
        TypeDesc::Delegate(def) => gen_delegate(repo, rules, def),
        TypeDesc::Builtin(_) => Err(Error::internal("hint names a built-in type")),
    }
}

/// The common binding header: all declarations in hint order, then the
/// interface method thunks.
pub fn gen_common_header(repo: &Repository, hints: &[Hint], buffer: &mut String) -> Result<()> {
    let mut rules = RuleBase::new();

    {
        let mut out = IndentedOutput::new(buffer, 4);
        out.write_line("\n#include <xcom/Types.hpp>\n");

        for hint in hints {
            match hint.kind {
                HintKind::GenImport => {
                    out.write_line(&format!(
                        "#include <{}>",
                        replace_idl_extension(&hint.parameter)
                    ));
                }
                HintKind::GenForward => {
                    let text = gen_forward(repo, hint)?;
                    out.write_line(&text);
                }
                HintKind::EnterNamespace => {
                    out.write_line(&format!("namespace {}\n{{", hint.parameter));
                    out.inc();
                }
                HintKind::LeaveNamespace => {
                    out.dec();
                    out.write_line("}");
                }
                HintKind::GenType => {
                    let text = gen_type(repo, &mut rules, hint_type(repo, hint)?)?;
                    out.write_line(&text);
                }
            }
        }

        for hint in hints {
            match hint.kind {
                HintKind::EnterNamespace => {
                    out.write_line(&format!("namespace {}\n{{", hint.parameter));
                    out.inc();
                }
                HintKind::LeaveNamespace => {
                    out.dec();
                    out.write_line("}");
                }
                HintKind::GenType => {
                    let id = hint_type(repo, hint)?;
                    if let TypeDesc::Interface(def) = repo.get(id) {
                        let text = gen_interface_methods(repo, &mut rules, def)?;
                        out.write_line(&text);
                    }
                }
                _ => {}
            }
        }
    }

    Ok(())
}

/// The tie header: one `Tie` template per interface in the hint stream.
/// Empty when the stream declares no interfaces.
pub fn gen_tie_header(repo: &Repository, hints: &[Hint], buffer: &mut String) -> Result<()> {
    let mut rules = RuleBase::new();

    let has_interfaces = hints.iter().any(|hint| {
        hint.kind == HintKind::GenType
            && repo
                .find(&hint.parameter)
                .map(|id| matches!(repo.get(id), TypeDesc::Interface(_)))
                .unwrap_or(false)
    });
    if !has_interfaces {
        return Ok(());
    }

    let mut out = IndentedOutput::new(buffer, 4);
    for hint in hints {
        match hint.kind {
            HintKind::EnterNamespace => {
                out.write_line(&format!("namespace {}\n{{", hint.parameter));
                out.inc();
            }
            HintKind::LeaveNamespace => {
                out.dec();
                out.write_line("}");
            }
            HintKind::GenType => {
                let id = hint_type(repo, hint)?;
                if let TypeDesc::Interface(def) = repo.get(id) {
                    let text = gen_interface_tie(repo, &mut rules, id, def)?;
                    out.write_line(&text);
                }
            }
            _ => {}
        }
    }

    Ok(())
}
