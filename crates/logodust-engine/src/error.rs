use thiserror::Error;

use crate::logo::ResolveError;
use crate::shader::ShaderError;

/// A GPU resource did not fit the device.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AllocationError {
    #[error("{what} needs {requested} bytes, device allows {limit}")]
    BufferTooLarge {
        what: &'static str,
        requested: u64,
        limit: u64,
    },

    #[error("{what} needs {workgroups} workgroups per dispatch, device allows {limit}")]
    DispatchTooLarge {
        what: &'static str,
        workgroups: u32,
        limit: u32,
    },

    #[error("{what} of {width}x{height} exceeds the device's {limit}px texture limit")]
    TextureTooLarge {
        what: &'static str,
        width: u32,
        height: u32,
        limit: u32,
    },
}

/// Fatal failure while building the particle field.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("adapter lacks a required capability: {0}")]
    MissingCapability(&'static str),

    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error(transparent)]
    Allocation(#[from] AllocationError),
}

/// Why a requested logo did not replace the current particles.
#[derive(Debug, Error)]
pub enum LogoError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Allocation(#[from] AllocationError),
}

/// Checks a buffer size against the device's buffer and storage binding limits.
pub(crate) fn check_storage_buffer(
    limits: &wgpu::Limits,
    what: &'static str,
    size: u64,
) -> Result<(), AllocationError> {
    let limit = limits.max_buffer_size.min(limits.max_storage_buffer_binding_size as u64);
    if size > limit {
        return Err(AllocationError::BufferTooLarge {
            what,
            requested: size,
            limit,
        });
    }
    Ok(())
}

/// Checks that `invocations` fit one 1D dispatch of `workgroup_size`-wide groups.
pub(crate) fn check_dispatch(
    limits: &wgpu::Limits,
    what: &'static str,
    invocations: u32,
    workgroup_size: u32,
) -> Result<(), AllocationError> {
    let workgroups = invocations.div_ceil(workgroup_size.max(1));
    let limit = limits.max_compute_workgroups_per_dimension;
    if workgroups > limit {
        return Err(AllocationError::DispatchTooLarge {
            what,
            workgroups,
            limit,
        });
    }
    Ok(())
}

/// Checks 2D texture dimensions against the device limit.
pub(crate) fn check_texture_2d(
    limits: &wgpu::Limits,
    what: &'static str,
    width: u32,
    height: u32,
) -> Result<(), AllocationError> {
    let limit = limits.max_texture_dimension_2d;
    if width > limit || height > limit {
        return Err(AllocationError::TextureTooLarge {
            what,
            width,
            height,
            limit,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_limit_uses_the_smaller_limit() {
        let limits = wgpu::Limits {
            max_buffer_size: 1 << 30,
            max_storage_buffer_binding_size: 1 << 20,
            ..wgpu::Limits::default()
        };
        assert!(check_storage_buffer(&limits, "particles", 1 << 20).is_ok());
        let err = check_storage_buffer(&limits, "particles", (1 << 20) + 1).unwrap_err();
        assert_eq!(
            err,
            AllocationError::BufferTooLarge {
                what: "particles",
                requested: (1 << 20) + 1,
                limit: 1 << 20,
            }
        );
    }

    #[test]
    fn dispatch_limit_counts_workgroups_not_bytes() {
        let limits = wgpu::Limits {
            max_storage_buffer_binding_size: 1 << 30,
            max_buffer_size: 1 << 30,
            max_compute_workgroups_per_dimension: 65535,
            ..wgpu::Limits::default()
        };
        let dense = 2048 * 2048;
        assert!(check_storage_buffer(&limits, "particles", dense as u64 * 32).is_ok());

        assert!(check_dispatch(&limits, "particles", 65535 * 64, 64).is_ok());
        assert_eq!(
            check_dispatch(&limits, "particles", dense, 64).unwrap_err(),
            AllocationError::DispatchTooLarge {
                what: "particles",
                workgroups: 65536,
                limit: 65535,
            }
        );
    }

    #[test]
    fn texture_limit_checks_both_axes() {
        let limits = wgpu::Limits {
            max_texture_dimension_2d: 2048,
            ..wgpu::Limits::default()
        };
        assert!(check_texture_2d(&limits, "force field", 2048, 2048).is_ok());
        assert!(check_texture_2d(&limits, "force field", 2049, 10).is_err());
        assert!(check_texture_2d(&limits, "force field", 10, 4096).is_err());
    }
}
