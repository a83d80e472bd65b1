//! CoreAudio implementation of the hardware seam
//!
//! All queries go against the system object or a device object through
//! `AudioObjectGetPropertyData`. Status codes are surfaced as
//! [`AudioError::Status`]; the core decides how to degrade.

use std::ffi::c_void;
use std::mem;
use std::ptr;
use std::sync::{Arc, Mutex};

use core_foundation::base::TCFType;
use core_foundation::string::{CFString, CFStringRef};
use coreaudio_sys::{
    kAudioDevicePropertyDeviceNameCFString, kAudioDevicePropertyStreamConfiguration,
    kAudioHardwarePropertyDefaultInputDevice, kAudioHardwarePropertyDefaultOutputDevice,
    kAudioHardwarePropertyDevices, kAudioObjectPropertyElementMaster,
    kAudioObjectPropertyScopeGlobal, kAudioObjectPropertyScopeInput,
    kAudioObjectPropertyScopeOutput, kAudioObjectSystemObject, AudioBuffer, AudioBufferList,
    AudioDeviceID,
    AudioObjectAddPropertyListener, AudioObjectGetPropertyData, AudioObjectGetPropertyDataSize,
    AudioObjectID, AudioObjectPropertyAddress, AudioObjectRemovePropertyListener,
    AudioObjectSetPropertyData, OSStatus,
};

use audioswitch_audio_core::{
    AudioError, AudioHardware, ChangeCallback, DeviceId, Direction, HardwareProperty,
};

/// `kAudioObjectUnknown`, reported when no default device exists
const UNKNOWN_OBJECT: AudioObjectID = 0;

const NO_ERR: OSStatus = 0;

/// A live property listener and the boxed callback it was handed
struct ListenerRegistration {
    address: AudioObjectPropertyAddress,
    client_data: *mut ChangeCallback,
}

// The pointer is only read by CoreAudio's notification thread and freed after
// the listener has been removed.
unsafe impl Send for ListenerRegistration {}

pub struct CoreAudioHardware {
    listeners: Mutex<Vec<ListenerRegistration>>,
}

impl CoreAudioHardware {
    pub fn new() -> Self {
        Self {
            listeners: Mutex::new(Vec::new()),
        }
    }
}

impl Default for CoreAudioHardware {
    fn default() -> Self {
        Self::new()
    }
}

fn property_address(selector: u32, scope: u32) -> AudioObjectPropertyAddress {
    AudioObjectPropertyAddress {
        mSelector: selector,
        mScope: scope,
        mElement: kAudioObjectPropertyElementMaster,
    }
}

fn direction_scope(direction: Direction) -> u32 {
    match direction {
        Direction::Output => kAudioObjectPropertyScopeOutput,
        Direction::Input => kAudioObjectPropertyScopeInput,
    }
}

fn default_device_selector(direction: Direction) -> u32 {
    match direction {
        Direction::Output => kAudioHardwarePropertyDefaultOutputDevice,
        Direction::Input => kAudioHardwarePropertyDefaultInputDevice,
    }
}

fn property_selector(property: HardwareProperty) -> u32 {
    match property {
        HardwareProperty::DeviceList => kAudioHardwarePropertyDevices,
        HardwareProperty::DefaultOutput => kAudioHardwarePropertyDefaultOutputDevice,
        HardwareProperty::DefaultInput => kAudioHardwarePropertyDefaultInputDevice,
    }
}

fn check(operation: &'static str, status: OSStatus) -> Result<(), AudioError> {
    if status == NO_ERR {
        Ok(())
    } else {
        Err(AudioError::status(operation, status))
    }
}

fn property_size(
    object: AudioObjectID,
    address: &AudioObjectPropertyAddress,
) -> Result<u32, AudioError> {
    let mut size: u32 = 0;
    let status = unsafe {
        AudioObjectGetPropertyDataSize(object, address as *const _, 0, ptr::null(), &mut size)
    };
    check("AudioObjectGetPropertyDataSize", status)?;
    Ok(size)
}

/// Read a fixed-size property value into `value`
fn read_property<T>(
    object: AudioObjectID,
    address: &AudioObjectPropertyAddress,
    value: &mut T,
) -> Result<(), AudioError> {
    let mut size = mem::size_of::<T>() as u32;
    let status = unsafe {
        AudioObjectGetPropertyData(
            object,
            address as *const _,
            0,
            ptr::null(),
            &mut size,
            value as *mut T as *mut c_void,
        )
    };
    check("AudioObjectGetPropertyData", status)
}

impl AudioHardware for CoreAudioHardware {
    fn device_ids(&self) -> Result<Vec<DeviceId>, AudioError> {
        let address = property_address(kAudioHardwarePropertyDevices, kAudioObjectPropertyScopeGlobal);
        let data_size = property_size(kAudioObjectSystemObject, &address)?;

        let device_count = data_size as usize / mem::size_of::<AudioDeviceID>();
        if device_count == 0 {
            return Ok(Vec::new());
        }

        let mut device_ids: Vec<AudioDeviceID> = vec![0; device_count];
        let mut actual_size = data_size;
        let status = unsafe {
            AudioObjectGetPropertyData(
                kAudioObjectSystemObject,
                &address as *const _,
                0,
                ptr::null(),
                &mut actual_size,
                device_ids.as_mut_ptr() as *mut c_void,
            )
        };
        check("AudioObjectGetPropertyData", status)?;

        // The roster can shrink between the size and data calls
        device_ids.truncate(actual_size as usize / mem::size_of::<AudioDeviceID>());
        Ok(device_ids)
    }

    fn device_name(&self, id: DeviceId) -> Result<String, AudioError> {
        let address = property_address(
            kAudioDevicePropertyDeviceNameCFString,
            kAudioObjectPropertyScopeGlobal,
        );
        let mut name_ref: CFStringRef = ptr::null();
        read_property(id, &address, &mut name_ref)?;

        if name_ref.is_null() {
            return Err(AudioError::NameUnavailable(id));
        }

        // The property getter hands back a retained string
        let name = unsafe { CFString::wrap_under_create_rule(name_ref) };
        Ok(name.to_string())
    }

    fn channel_count(&self, id: DeviceId, direction: Direction) -> Result<u32, AudioError> {
        let address = property_address(
            kAudioDevicePropertyStreamConfiguration,
            direction_scope(direction),
        );
        let data_size = property_size(id, &address)?;
        if (data_size as usize) < mem::size_of::<u32>() {
            return Ok(0);
        }

        // u64 storage keeps the AudioBufferList suitably aligned
        let bytes = (data_size as usize).max(mem::size_of::<AudioBufferList>());
        let mut storage: Vec<u64> = vec![0; bytes.div_ceil(mem::size_of::<u64>())];
        let mut actual_size = data_size;
        let status = unsafe {
            AudioObjectGetPropertyData(
                id,
                &address as *const _,
                0,
                ptr::null(),
                &mut actual_size,
                storage.as_mut_ptr() as *mut c_void,
            )
        };
        check("AudioObjectGetPropertyData", status)?;

        let list = unsafe { &*(storage.as_ptr() as *const AudioBufferList) };
        let capacity = (actual_size as usize)
            .saturating_sub(mem::offset_of!(AudioBufferList, mBuffers))
            / mem::size_of::<AudioBuffer>();
        let buffer_count = (list.mNumberBuffers as usize).min(capacity);

        let buffers = unsafe { std::slice::from_raw_parts(list.mBuffers.as_ptr(), buffer_count) };
        Ok(buffers.iter().map(|buffer| buffer.mNumberChannels).sum())
    }

    fn default_device(&self, direction: Direction) -> Result<Option<DeviceId>, AudioError> {
        let address = property_address(
            default_device_selector(direction),
            kAudioObjectPropertyScopeGlobal,
        );
        let mut device_id: AudioDeviceID = UNKNOWN_OBJECT;
        read_property(kAudioObjectSystemObject, &address, &mut device_id)?;

        Ok((device_id != UNKNOWN_OBJECT).then_some(device_id))
    }

    fn set_default_device(&self, direction: Direction, id: DeviceId) -> Result<(), AudioError> {
        let address = property_address(
            default_device_selector(direction),
            kAudioObjectPropertyScopeGlobal,
        );
        let device_id: AudioDeviceID = id;
        let status = unsafe {
            AudioObjectSetPropertyData(
                kAudioObjectSystemObject,
                &address as *const _,
                0,
                ptr::null(),
                mem::size_of::<AudioDeviceID>() as u32,
                &device_id as *const AudioDeviceID as *const c_void,
            )
        };
        check("AudioObjectSetPropertyData", status)
    }

    fn add_property_listener(
        &self,
        property: HardwareProperty,
        callback: ChangeCallback,
    ) -> Result<(), AudioError> {
        let address = property_address(property_selector(property), kAudioObjectPropertyScopeGlobal);
        let client_data = Box::into_raw(Box::new(callback));

        let status = unsafe {
            AudioObjectAddPropertyListener(
                kAudioObjectSystemObject,
                &address as *const _,
                Some(property_listener),
                client_data as *mut c_void,
            )
        };

        if status != NO_ERR {
            drop(unsafe { Box::from_raw(client_data) });
            return Err(AudioError::ListenerRegistration { property, status });
        }

        self.listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(ListenerRegistration {
                address,
                client_data,
            });
        tracing::debug!(?property, "Registered CoreAudio property listener");
        Ok(())
    }
}

impl Drop for CoreAudioHardware {
    fn drop(&mut self) {
        let listeners = self.listeners.get_mut().unwrap_or_else(|e| e.into_inner());
        for registration in listeners.drain(..) {
            let status = unsafe {
                AudioObjectRemovePropertyListener(
                    kAudioObjectSystemObject,
                    &registration.address as *const _,
                    Some(property_listener),
                    registration.client_data as *mut c_void,
                )
            };
            if status != NO_ERR {
                // Still registered; leaking the callback is the only safe option
                tracing::warn!(status, "Failed to remove CoreAudio property listener");
                continue;
            }
            drop(unsafe { Box::from_raw(registration.client_data) });
        }
    }
}

/// Runs on CoreAudio's notification thread; only forwards to the callback,
/// which posts to the UI queue.
unsafe extern "C" fn property_listener(
    _in_object_id: AudioObjectID,
    _in_number_addresses: u32,
    _in_addresses: *const AudioObjectPropertyAddress,
    in_client_data: *mut c_void,
) -> OSStatus {
    if let Some(callback) = (in_client_data as *const ChangeCallback).as_ref() {
        callback();
    }
    NO_ERR
}

/// Convenience for callers that hold the backend behind the core's seam
pub fn system_hardware() -> Arc<dyn AudioHardware> {
    Arc::new(CoreAudioHardware::new())
}
