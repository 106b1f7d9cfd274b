use super::{Emitter, ValueSetArtifact};
use crate::error::{GenError, Result};
use crate::model::Coding;

pub const DEFAULT_JAVA_PACKAGE: &str = "edu.gatech.chai.VRDR.model.valueset";

const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final",
    "finally", "float", "for", "goto", "if", "implements", "import", "instanceof", "int",
    "interface", "long", "native", "new", "null", "package", "private", "protected", "public",
    "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this", "throw",
    "throws", "transient", "true", "try", "void", "volatile", "while", "_",
];

/// Writes `<name>.java` holding a `url` constant and a `HashSet<CodeableConcept>`
/// literal built from HAPI FHIR R4 model classes.
#[derive(Debug, Clone)]
pub struct JavaEmitter {
    package: String,
}

impl JavaEmitter {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
        }
    }

    fn check_package(&self) -> Result<()> {
        if self.package.is_empty() || self.package.split('.').all(is_java_identifier) {
            Ok(())
        } else {
            Err(GenError::InvalidIdentifier {
                name: self.package.clone(),
                target: "Java package",
            })
        }
    }
}

impl Default for JavaEmitter {
    fn default() -> Self {
        Self::new(DEFAULT_JAVA_PACKAGE)
    }
}

impl Emitter for JavaEmitter {
    fn target(&self) -> &'static str {
        "Java"
    }

    fn file_name(&self, value_set_name: &str) -> Result<String> {
        if !is_java_identifier(value_set_name) {
            return Err(GenError::InvalidIdentifier {
                name: value_set_name.to_string(),
                target: self.target(),
            });
        }
        Ok(format!("{}.java", value_set_name))
    }

    fn render(&self, artifact: &ValueSetArtifact<'_>) -> Result<String> {
        self.check_package()?;
        if !is_java_identifier(artifact.name) {
            return Err(GenError::InvalidIdentifier {
                name: artifact.name.to_string(),
                target: self.target(),
            });
        }

        let mut src = String::new();
        src.push_str("// @generated by vrdr-valueset-gen\n");
        src.push_str("// DO NOT EDIT MANUALLY\n\n");
        if !self.package.is_empty() {
            src.push_str(&format!("package {};\n\n", self.package));
        }
        src.push_str("import java.util.Arrays;\n");
        src.push_str("import java.util.HashSet;\n\n");
        src.push_str("import org.hl7.fhir.r4.model.CodeableConcept;\n");
        src.push_str("import org.hl7.fhir.r4.model.Coding;\n\n");

        src.push_str(&format!("public class {} {{\n", artifact.name));
        src.push_str(&format!(
            "    public static final String url = {};\n",
            java_string_literal(artifact.url)
        ));

        if artifact.codings.is_empty() {
            src.push_str("    public static final HashSet<CodeableConcept> valueSet = new HashSet<>();\n");
        } else {
            src.push_str(
                "    public static final HashSet<CodeableConcept> valueSet = new HashSet<>(Arrays.asList(\n",
            );
            let entries: Vec<String> = artifact
                .codings
                .iter()
                .map(|c| format!("        {}", codeable_concept_expr(c)))
                .collect();
            src.push_str(&entries.join(",\n"));
            src.push_str("\n    ));\n");
        }
        src.push_str("}\n");

        Ok(src)
    }
}

fn codeable_concept_expr(coding: &Coding) -> String {
    let display = match coding.display.as_deref() {
        Some(d) => java_string_literal(d),
        None => "null".to_string(),
    };
    format!(
        "new CodeableConcept().addCoding(new Coding({}, {}, {}))",
        java_string_literal(&coding.system),
        java_string_literal(&coding.code),
        display
    )
}

pub(crate) fn is_java_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_alphabetic() || first == '_' || first == '$') {
        return false;
    }
    if !chars.all(|ch| ch.is_alphanumeric() || ch == '_' || ch == '$') {
        return false;
    }
    !JAVA_KEYWORDS.contains(&name)
}

/// Quote `s` as a Java string literal.
pub(crate) fn java_string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
