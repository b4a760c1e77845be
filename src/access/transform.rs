//! Applying access rules to class file bytes.

use anyhow::{anyhow, Context, Result};
use log::debug;
use rachis::flags::{self, AccessFlags};
use rachis::name::ClassNameSlice;
use rachis::ClassFile;
use crate::access::rules::{AccessRule, AccessRuleSet, FinalAction, RuleTarget, Visibility};

/// Rewrites access flags in class files according to an [`AccessRuleSet`].
///
/// Everything but the patched flag words stays byte for byte as it was.
#[derive(Debug)]
pub struct AccessTransformer {
	rules: AccessRuleSet,
}

impl AccessTransformer {
	pub fn new(rules: AccessRuleSet) -> AccessTransformer {
		AccessTransformer { rules }
	}

	/// Applies the rules targeting the named class to the given bytes.
	///
	/// Takes and gives back an `Option` so that a class missing from its
	/// container stays missing; classes no rule targets come back with
	/// their bytes untouched.
	pub fn transform(&self, class_name: &ClassNameSlice, class_bytes: Option<Vec<u8>>) -> Result<Option<Vec<u8>>> {
		let Some(bytes) = class_bytes else {
			return Ok(None);
		};

		let binary_name = class_name.to_binary();
		let Some(rules) = self.rules.for_class(&binary_name) else {
			return Ok(Some(bytes));
		};

		let mut class = ClassFile::parse(bytes)
			.with_context(|| anyhow!("failed to parse class {class_name}"))?;

		for rule in rules {
			apply_rule(&mut class, rule)
				.with_context(|| anyhow!("failed to apply a {:?} rule to class {class_name}", rule.visibility))?;
		}

		Ok(Some(class.into_bytes()))
	}
}

fn apply_rule(class: &mut ClassFile, rule: &AccessRule) -> Result<()> {
	match &rule.target {
		RuleTarget::Class => {
			let flags = apply_to_flags(class.access_flags, rule, true)?;
			debug!("class {}: {:?} -> {:?}", class.this_class, class.access_flags, flags);
			class.access_flags = flags;
		},
		RuleTarget::Field { name } => {
			for field in &mut class.fields {
				if name == "*" || field.name.as_str() == name {
					let flags = apply_to_flags(field.access_flags, rule, true)?;
					debug!("field {}.{}: {:?} -> {:?}", class.this_class, field.name, field.access_flags, flags);
					field.access_flags = flags;

					if name != "*" {
						break;
					}
				}
			}
		},
		RuleTarget::Method { name, descriptor } => {
			for method in &mut class.methods {
				// the name `*` matches any method, no matter its descriptor
				if name == "*" || (method.name.as_str() == name && method.descriptor.as_str() == descriptor) {
					// method rules never touch the final flag
					let flags = apply_to_flags(method.access_flags, rule, false)?;
					debug!("method {}.{}{}: {:?} -> {:?}", class.this_class, method.name, method.descriptor, method.access_flags, flags);
					method.access_flags = flags;

					if name != "*" {
						break;
					}
				}
			}
		},
	}

	Ok(())
}

fn apply_to_flags(access_flags: AccessFlags, rule: &AccessRule, allow_final: bool) -> Result<AccessFlags> {
	let widened = rule.visibility.widen(Visibility::from_flags(access_flags)?);

	let mut bits = (u16::from(access_flags) & !flags::VISIBILITY_MASK) | widened.bits();

	if allow_final {
		match rule.final_action {
			FinalAction::NoChange => {},
			FinalAction::ForceFinal => bits |= flags::ACC_FINAL,
			FinalAction::ForceNonFinal => bits &= !flags::ACC_FINAL,
		}
	}

	Ok(bits.into())
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use anyhow::Result;
	use rachis::flags::{self, AccessFlags};
	use super::{apply_to_flags, AccessRule, FinalAction, RuleTarget, Visibility};

	fn rule(visibility: Visibility, final_action: FinalAction) -> AccessRule {
		AccessRule { visibility, final_action, target: RuleTarget::Class }
	}

	#[test]
	fn never_narrows_visibility() -> Result<()> {
		use Visibility::{Default, Private, Protected, Public};

		let cases = [
			(Private, Private, Private),
			(Private, Default, Default),
			(Private, Protected, Protected),
			(Private, Public, Public),
			(Default, Private, Default),
			(Default, Default, Default),
			(Default, Protected, Protected),
			(Default, Public, Public),
			(Protected, Private, Protected),
			(Protected, Default, Protected),
			(Protected, Protected, Protected),
			(Protected, Public, Public),
			(Public, Private, Public),
			(Public, Default, Public),
			(Public, Protected, Public),
			(Public, Public, Public),
		];

		for (current, target, expected) in cases {
			let access_flags = AccessFlags::from(current.bits() | flags::ACC_STATIC);
			let out = apply_to_flags(access_flags, &rule(target, FinalAction::NoChange), true)?;

			assert_eq!(Visibility::from_flags(out)?, expected, "{target:?} applied to {current:?}");
			// bits outside the visibility mask stay put
			assert_eq!(u16::from(out) & !flags::VISIBILITY_MASK, flags::ACC_STATIC);
		}
		Ok(())
	}

	#[test]
	fn sets_and_clears_the_final_flag() -> Result<()> {
		let out = apply_to_flags(
			AccessFlags::from(flags::ACC_PRIVATE | flags::ACC_FINAL),
			&rule(Visibility::Public, FinalAction::ForceNonFinal),
			true,
		)?;
		assert_eq!(u16::from(out), flags::ACC_PUBLIC);

		let out = apply_to_flags(
			AccessFlags::from(flags::ACC_PUBLIC),
			&rule(Visibility::Public, FinalAction::ForceFinal),
			true,
		)?;
		assert_eq!(u16::from(out), flags::ACC_PUBLIC | flags::ACC_FINAL);
		Ok(())
	}

	#[test]
	fn leaves_the_final_flag_alone_when_not_allowed() -> Result<()> {
		let out = apply_to_flags(
			AccessFlags::from(flags::ACC_PRIVATE | flags::ACC_FINAL),
			&rule(Visibility::Public, FinalAction::ForceNonFinal),
			false,
		)?;
		assert_eq!(u16::from(out), flags::ACC_PUBLIC | flags::ACC_FINAL);
		Ok(())
	}

	#[test]
	fn rejects_illegal_visibility_bits() {
		let access_flags = AccessFlags::from(flags::ACC_PUBLIC | flags::ACC_PRIVATE);
		let err = apply_to_flags(access_flags, &rule(Visibility::Public, FinalAction::NoChange), true).unwrap_err();

		assert!(format!("{err:#}").contains("illegal visibility bits"), "{err:#}");
	}
}
