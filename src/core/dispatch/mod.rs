//! Method resolution and delegation
//!
//! A class's dispatch chain for a method is computed on demand from its
//! capability set: the last included module that defines the method comes
//! first, then the earlier modules in reverse inclusion order, and finally
//! the class's own implementation if it has one. Only links that actually
//! define the method take part.
//!
//! Each link receives a [`Next`] handle. Calling [`Next::delegate`] runs the
//! following link and hands back its result, which is how a module builds on
//! the behaviour it overrides.

use tracing::debug;

use crate::core::capability::MethodImpl;
use crate::core::class::Class;
use crate::core::error::DispatchError;

#[cfg(test)]
mod tests;

/// One implementation in a dispatch chain
#[derive(Clone)]
pub struct Link {
    owner: String,
    implementation: MethodImpl,
}

impl Link {
    /// Name of the module or class that defines this implementation
    pub fn owner(&self) -> &str {
        &self.owner
    }
}

impl std::fmt::Debug for Link {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Link").field("owner", &self.owner).finish()
    }
}

/// Ordered implementations of one method for one class
#[derive(Debug, Clone)]
pub struct DispatchChain {
    class: String,
    method: String,
    links: Vec<Link>,
}

impl DispatchChain {
    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Owners of each link, in dispatch order
    pub fn owners(&self) -> Vec<&str> {
        self.links.iter().map(Link::owner).collect()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Invokes the first link of the chain
    pub fn invoke(&self, args: &[String]) -> Result<String, DispatchError> {
        self.invoke_at(0, args)
    }

    fn invoke_at(&self, position: usize, args: &[String]) -> Result<String, DispatchError> {
        let Some(link) = self.links.get(position) else {
            return Err(self.missing_link(position));
        };

        debug!(
            "Dispatching {}#{} to {} (link {}/{})",
            self.class,
            self.method,
            link.owner,
            position + 1,
            self.links.len()
        );

        let next = Next {
            chain: self,
            position,
            args,
        };
        (link.implementation)(&next, args)
    }

    fn missing_link(&self, position: usize) -> DispatchError {
        match position.checked_sub(1).and_then(|previous| self.links.get(previous)) {
            Some(previous) => DispatchError::NoNextImplementation {
                method: self.method.clone(),
                owner: previous.owner.clone(),
            },
            None => DispatchError::NoImplementationFound {
                class: self.class.clone(),
                method: self.method.clone(),
            },
        }
    }
}

/// Delegation handle passed to every link.
///
/// Holds the chain and the position of the running link, so delegating
/// always reaches exactly the following link.
#[derive(Debug)]
pub struct Next<'a> {
    chain: &'a DispatchChain,
    position: usize,
    args: &'a [String],
}

impl<'a> Next<'a> {
    /// Invokes the next link with the arguments of the current call
    pub fn delegate(&self) -> Result<String, DispatchError> {
        self.delegate_with(self.args)
    }

    /// Invokes the next link with different arguments
    pub fn delegate_with(&self, args: &[String]) -> Result<String, DispatchError> {
        debug!(
            "{} delegates {} to the next link",
            self.owner(),
            self.chain.method
        );
        self.chain.invoke_at(self.position + 1, args)
    }

    pub fn has_next(&self) -> bool {
        self.position + 1 < self.chain.links.len()
    }

    /// Owner of the link currently running
    pub fn owner(&self) -> &str {
        &self.chain.links[self.position].owner
    }

    pub fn method(&self) -> &str {
        &self.chain.method
    }

    pub fn args(&self) -> &[String] {
        self.args
    }
}

/// Computes the dispatch chain of `method` for `class`
pub fn resolve(class: &Class, method: &str) -> Result<DispatchChain, DispatchError> {
    let mut links: Vec<Link> = class
        .capabilities()
        .dispatch_order()
        .filter_map(|module| {
            module.method(method).map(|implementation| Link {
                owner: module.name().to_string(),
                implementation: implementation.clone(),
            })
        })
        .collect();

    if let Some(implementation) = class.own_methods().method(method) {
        links.push(Link {
            owner: class.name().to_string(),
            implementation: implementation.clone(),
        });
    }

    if links.is_empty() {
        return Err(DispatchError::NoImplementationFound {
            class: class.name().to_string(),
            method: method.to_string(),
        });
    }

    debug!(
        "Resolved {}#{} -> [{}]",
        class.name(),
        method,
        links
            .iter()
            .map(Link::owner)
            .collect::<Vec<_>>()
            .join(", ")
    );

    Ok(DispatchChain {
        class: class.name().to_string(),
        method: method.to_string(),
        links,
    })
}
