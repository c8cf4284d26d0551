//! IPv4 network blocks owned by teams and sequential host address allocation.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NetworkError {
    #[error("cidr string cannot be empty")]
    Empty,
    #[error("`{0}` is not a valid IPv4 address")]
    Address(String),
    #[error("prefix length `{0}` must be between 0 and 32")]
    Prefix(String),
    #[error("no free host address left in {0}")]
    Exhausted(Ipv4Cidr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Cidr {
    base: Ipv4Addr,
    prefix: u8,
}

impl Ipv4Cidr {
    pub fn new(base: Ipv4Addr, prefix: u8) -> Result<Self, NetworkError> {
        if prefix > 32 {
            return Err(NetworkError::Prefix(prefix.to_string()));
        }
        Ok(Self { base, prefix })
    }

    pub fn base(&self) -> Ipv4Addr {
        self.base
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    fn mask(&self) -> u32 {
        if self.prefix == 0 { 0 } else { u32::MAX << (32 - u32::from(self.prefix)) }
    }

    /// First address of the block.
    pub fn network(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.base) & self.mask())
    }

    /// Last address of the block.
    pub fn broadcast(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.network()) | !self.mask())
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        u32::from(addr) & self.mask() == u32::from(self.network())
    }

    /// Usable host addresses, excluding the network and broadcast addresses.
    pub fn host_capacity(&self) -> u64 {
        let size = 1u64 << (32 - u32::from(self.prefix));
        size.saturating_sub(2)
    }

    pub fn allocator(&self) -> HostAllocator {
        HostAllocator { cidr: *self, next: u64::from(u32::from(self.network())) + 1 }
    }
}

impl FromStr for Ipv4Cidr {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(NetworkError::Empty);
        }
        let (addr, prefix) = match s.split_once('/') {
            Some((a, p)) => (a, Some(p)),
            None => (s, None),
        };
        let base = addr.parse::<Ipv4Addr>().map_err(|_| NetworkError::Address(addr.to_string()))?;
        let prefix = match prefix {
            Some(p) => p.parse::<u8>().map_err(|_| NetworkError::Prefix(p.to_string()))?,
            None => 32,
        };
        Self::new(base, prefix)
    }
}

impl fmt::Display for Ipv4Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.prefix)
    }
}

/// Hands out consecutive host addresses of a block, starting right after the
/// network address. The first address handed out is the team gateway.
#[derive(Debug, Clone)]
pub struct HostAllocator {
    cidr: Ipv4Cidr,
    next: u64,
}

impl HostAllocator {
    pub fn next_host(&mut self) -> Result<Ipv4Addr, NetworkError> {
        let broadcast = u64::from(u32::from(self.cidr.broadcast()));
        if self.next >= broadcast {
            return Err(NetworkError::Exhausted(self.cidr));
        }
        let addr = Ipv4Addr::from(self.next as u32);
        self.next += 1;
        Ok(addr)
    }
}
